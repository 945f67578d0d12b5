//! Request extractors that keep rejections inside the app's error envelope.

use axum::extract::FromRequest;

use crate::Error;

/// A JSON body extractor whose rejection is rendered as the standard
/// `{"error": {...}}` envelope instead of axum's plain-text response.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct AppJson<T>(pub T);
