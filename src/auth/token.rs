//! JSON Web Token issuance and verification.
//!
//! Tokens are signed with a shared secret (HS256) and carry everything the
//! handlers need, so verification is purely cryptographic: no session store,
//! no revocation list. Logout is client-side token discard.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::Error;

/// How long an access token stays valid.
pub const ACCESS_TOKEN_DURATION: Duration = Duration::hours(1);

/// How long a refresh token stays valid.
pub const REFRESH_TOKEN_DURATION: Duration = Duration::days(7);

/// The access token lifetime in seconds, reported to clients as `expiresIn`.
pub const ACCESS_TOKEN_EXPIRES_IN_SECONDS: u64 = 3600;

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// The user's email address. Absent on refresh tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// The time the token was issued.
    pub iat: usize,
    /// The expiry time of the token.
    pub exp: usize,
}

/// The signing keys derived from the shared JWT secret.
#[derive(Clone)]
pub struct AuthKeys {
    /// The encoding key for signing JWTs.
    pub encoding_key: EncodingKey,
    /// The decoding key for verifying JWTs.
    pub decoding_key: DecodingKey,
}

impl AuthKeys {
    /// Derive the encoding and decoding keys from a shared secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

/// The token pair returned by the auth endpoints.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// The short-lived bearer token for API requests.
    pub access_token: String,
    /// The long-lived token for minting new pairs via the refresh endpoint.
    pub refresh_token: String,
    /// The access token lifetime in seconds.
    pub expires_in: u64,
}

/// Issue a fresh access/refresh token pair for a user.
///
/// # Errors
///
/// Returns [Error::TokenCreation] if signing fails.
pub fn issue_token_pair(user_id: &str, email: &str, keys: &AuthKeys) -> Result<TokenPair, Error> {
    Ok(TokenPair {
        access_token: issue_access_token(user_id, email, keys)?,
        refresh_token: issue_refresh_token(user_id, keys)?,
        expires_in: ACCESS_TOKEN_EXPIRES_IN_SECONDS,
    })
}

/// Issue a short-lived access token carrying the user's ID and email.
///
/// # Errors
///
/// Returns [Error::TokenCreation] if signing fails.
pub fn issue_access_token(user_id: &str, email: &str, keys: &AuthKeys) -> Result<String, Error> {
    encode_claims(
        build_claims(user_id, Some(email), ACCESS_TOKEN_DURATION),
        keys,
    )
}

/// Issue a long-lived refresh token carrying only the user's ID.
///
/// # Errors
///
/// Returns [Error::TokenCreation] if signing fails.
pub fn issue_refresh_token(user_id: &str, keys: &AuthKeys) -> Result<String, Error> {
    encode_claims(build_claims(user_id, None, REFRESH_TOKEN_DURATION), keys)
}

/// Verify a token's signature and expiry, returning its claims.
///
/// # Errors
///
/// Returns [Error::InvalidToken] if the signature is invalid or the token
/// has expired.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|_| Error::InvalidToken)
}

fn build_claims(user_id: &str, email: Option<&str>, lifetime: Duration) -> Claims {
    let now = OffsetDateTime::now_utc();

    Claims {
        user_id: user_id.to_owned(),
        email: email.map(str::to_owned),
        iat: now.unix_timestamp() as usize,
        exp: (now + lifetime).unix_timestamp() as usize,
    }
}

fn encode_claims(claims: Claims, keys: &AuthKeys) -> Result<String, Error> {
    encode(&Header::default(), &claims, &keys.encoding_key).map_err(|_| Error::TokenCreation)
}

impl<S> FromRequestParts<S> for Claims
where
    AuthKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::InvalidToken)?;

        let keys = AuthKeys::from_ref(state);

        decode_token(bearer.token(), &keys.decoding_key)
    }
}
