//! The login endpoint.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{AuthResponse, token::issue_token_pair},
    error::FieldError,
    extract::AppJson,
    user::{find_user_id_by_email, get_user_by_id},
    validation::{is_valid_email, normalize_email},
};

/// The credentials entered during sign-in.
#[derive(Debug, Deserialize)]
pub struct LogInRequest {
    /// Email entered during sign-in.
    pub email: String,
    /// Password entered during sign-in.
    pub password: String,
}

impl LogInRequest {
    fn validate(&self) -> Result<String, Error> {
        let mut errors = Vec::new();

        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }

        if self.password.chars().count() < 8 {
            errors.push(FieldError::new(
                "password",
                "must be at least 8 characters",
            ));
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(normalize_email(&self.email))
    }
}

/// A route handler for signing in with an email and password.
///
/// Responds with the same authentication error whether the email is unknown
/// or the password is wrong, so clients cannot probe which emails are
/// registered.
pub async fn post_log_in(
    State(state): State<AppState>,
    AppJson(request): AppJson<LogInRequest>,
) -> Result<Json<AuthResponse>, Error> {
    let email = request.validate()?;

    let user_id =
        find_user_id_by_email(&email, &state.store)?.ok_or(Error::InvalidCredentials)?;

    let user = get_user_by_id(&user_id, &state.store).map_err(|error| match error {
        // A dangling email index entry counts as bad credentials, not a 404.
        Error::NotFound => Error::InvalidCredentials,
        error => error,
    })?;

    if !user.password.verify(&request.password)? {
        return Err(Error::InvalidCredentials);
    }

    let tokens = issue_token_pair(&user.id, &user.email, &state.auth_keys)?;

    Ok(Json(AuthResponse {
        user: user.public(),
        tokens,
    }))
}
