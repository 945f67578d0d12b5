//! The token refresh endpoint.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::token::{TokenPair, decode_token, issue_token_pair},
    error::FieldError,
    extract::AppJson,
    user::get_user_by_id,
};

/// The body of a refresh request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token issued by a previous register, login, or refresh.
    pub refresh_token: String,
}

/// A route handler for exchanging a refresh token for a new token pair.
///
/// The user record is re-read so tokens for deleted users stop refreshing.
pub async fn refresh_tokens(
    State(state): State<AppState>,
    AppJson(request): AppJson<RefreshRequest>,
) -> Result<Json<TokenPair>, Error> {
    if request.refresh_token.is_empty() {
        return Err(Error::Validation(vec![FieldError::new(
            "refreshToken",
            "must not be empty",
        )]));
    }

    let claims = decode_token(&request.refresh_token, &state.auth_keys.decoding_key)?;

    let user = get_user_by_id(&claims.user_id, &state.store).map_err(|error| match error {
        Error::NotFound => Error::InvalidToken,
        error => error,
    })?;

    let tokens = issue_token_pair(&user.id, &user.email, &state.auth_keys)?;

    Ok(Json(tokens))
}
