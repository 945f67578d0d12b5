//! Opaque continuation cursors for list endpoints.
//!
//! A cursor is the last evaluated sort key of a partition scan, base64
//! encoded so clients treat it as an opaque token rather than a key they can
//! construct or interpret.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{Error, error::FieldError};

/// Encode the last evaluated sort key as an opaque cursor.
pub fn encode_cursor(last_key: &str) -> String {
    URL_SAFE_NO_PAD.encode(last_key)
}

/// Decode a client-supplied cursor back into a sort key.
///
/// # Errors
///
/// Returns [Error::Validation] if the cursor is not valid base64 or does not
/// decode to UTF-8.
pub fn decode_cursor(cursor: &str) -> Result<String, Error> {
    let invalid = || Error::Validation(vec![FieldError::new("cursor", "invalid cursor")]);

    let bytes = URL_SAFE_NO_PAD.decode(cursor).map_err(|_| invalid())?;

    String::from_utf8(bytes).map_err(|_| invalid())
}
