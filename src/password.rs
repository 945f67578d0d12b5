//! Password hashing and verification.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A salted and hashed password.
///
/// Length policy for raw passwords is enforced by the registration schema;
/// this type only deals in hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a raw password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed
    /// to verify a password. Pass in [PasswordHash::DEFAULT_COST] to use the
    /// recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(raw_password: &str, cost: u32) -> Result<Self, Error> {
        match hash(raw_password, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` without hashing.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid bcrypt
    /// hash, e.g. one read back from the store.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored password.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash could not be parsed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|e| Error::HashingError(e.to_string()))
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
