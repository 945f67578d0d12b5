//! Defines the app level error type and the conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// A single violated field reported by request validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// The name of the request field that failed validation.
    pub field: String,
    /// A human-readable description of the violation.
    pub message: String,
}

impl FieldError {
    /// Create a field error for `field` with `message`.
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
        }
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid email and password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The bearer token is missing, malformed, expired, or has a bad signature.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The email address is already registered.
    #[error("a user with this email already exists")]
    DuplicateEmail,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The request body or query string violated one or more schema constraints.
    ///
    /// Carries an entry for every violated field, not just the first one.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// A stored payload could not be serialized or deserialized as JSON.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not (de)serialize record payload: {0}")]
    PayloadSerialization(String),

    /// Signing a JSON Web Token failed.
    #[error("token creation failed")]
    TokenCreation,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),
}

impl Error {
    /// The machine-readable error code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidCredentials | Error::InvalidToken => "AUTHENTICATION_ERROR",
            Error::DuplicateEmail => "CONFLICT",
            Error::NotFound => "NOT_FOUND",
            Error::Validation(_) => "VALIDATION_ERROR",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }

    /// The HTTP status code the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::InvalidToken => StatusCode::UNAUTHORIZED,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(vec![FieldError::new("body", &rejection.body_text())])
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let body = match &self {
            Error::Validation(details) => json!({
                "error": {
                    "code": code,
                    "message": "Validation failed",
                    "details": details,
                }
            }),
            Error::InvalidCredentials
            | Error::InvalidToken
            | Error::DuplicateEmail
            | Error::NotFound => json!({
                "error": {
                    "code": code,
                    "message": self.to_string(),
                }
            }),
            // Internal errors are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                json!({
                    "error": {
                        "code": code,
                        "message": "An unexpected error occurred",
                    }
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::{Error, FieldError};

    async fn response_json(error: Error) -> serde_json::Value {
        let response = error.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(
            Error::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Error::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::DuplicateEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(Error::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::DatabaseLock.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn validation_error_lists_every_field() {
        let error = Error::Validation(vec![
            FieldError::new("email", "must be a valid email address"),
            FieldError::new("password", "must be at least 8 characters"),
        ]);

        let body = response_json(error).await;

        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        let details = body["error"]["details"].as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0]["field"], "email");
        assert_eq!(details[1]["field"], "password");
    }

    #[tokio::test]
    async fn internal_error_hides_details_from_client() {
        let body = response_json(Error::HashingError("bcrypt exploded".to_owned())).await;

        assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
        assert_eq!(body["error"]["message"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn not_found_uses_machine_readable_code() {
        let body = response_json(Error::NotFound).await;

        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
