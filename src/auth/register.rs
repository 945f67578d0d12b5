//! The registration endpoint.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash,
    auth::{AuthResponse, token::issue_token_pair},
    error::FieldError,
    extract::AppJson,
    user::{User, find_user_id_by_email, insert_user},
    validation::{MAX_NAME_LENGTH, PASSWORD_LENGTH, is_valid_email, normalize_email},
};

/// The body of a registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// The email address to register with.
    pub email: String,
    /// The raw password.
    pub password: String,
    /// The user's display name.
    pub name: String,
}

impl RegisterRequest {
    /// Check every field, returning the normalized email on success.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] listing each violated field.
    fn validate(&self) -> Result<String, Error> {
        let mut errors = Vec::new();

        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }

        if !PASSWORD_LENGTH.contains(&self.password.chars().count()) {
            errors.push(FieldError::new(
                "password",
                "must be between 8 and 100 characters",
            ));
        }

        let name_length = self.name.chars().count();
        if name_length == 0 || name_length > MAX_NAME_LENGTH {
            errors.push(FieldError::new(
                "name",
                "must be between 1 and 100 characters",
            ));
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(normalize_email(&self.email))
    }
}

/// A route handler for registering a new user.
///
/// Writes the user record and the email index record as two separate puts.
/// There is no transaction around them, so a crash in between can leave an
/// orphaned index entry; the duplicate check above treats such an entry as a
/// taken email rather than trying to repair it.
pub async fn register_user(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), Error> {
    let email = request.validate()?;

    if find_user_id_by_email(&email, &state.store)?.is_some() {
        return Err(Error::DuplicateEmail);
    }

    let password_hash = PasswordHash::new(&request.password, PasswordHash::DEFAULT_COST)?;
    let user = User::build(email, request.name.clone(), password_hash);

    insert_user(&user, &state.store)?;

    let tokens = issue_token_pair(&user.id, &user.email, &state.auth_keys)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.public(),
            tokens,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_utils::get_test_server;

    #[tokio::test]
    async fn register_returns_user_and_tokens() {
        let server = get_test_server();

        let response = server
            .post("/auth/register")
            .json(&json!({
                "email": "Foo@Bar.Baz",
                "password": "averysafepassword",
                "name": "Foo",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["user"]["email"], "foo@bar.baz");
        assert_eq!(body["user"]["name"], "Foo");
        assert!(body["user"]["id"].as_str().is_some());
        assert!(body["user"].get("password").is_none());
        assert!(body["tokens"]["accessToken"].as_str().is_some());
        assert!(body["tokens"]["refreshToken"].as_str().is_some());
        assert_eq!(body["tokens"]["expiresIn"], 3600);
    }

    #[tokio::test]
    async fn register_same_email_twice_returns_conflict() {
        let server = get_test_server();
        let request = json!({
            "email": "foo@bar.baz",
            "password": "averysafepassword",
            "name": "Foo",
        });

        server
            .post("/auth/register")
            .json(&request)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post("/auth/register").json(&request).await;

        response.assert_status(StatusCode::CONFLICT);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn duplicate_check_ignores_email_case() {
        let server = get_test_server();

        server
            .post("/auth/register")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafepassword",
                "name": "Foo",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .post("/auth/register")
            .json(&json!({
                "email": "FOO@BAR.BAZ",
                "password": "averysafepassword",
                "name": "Foo Again",
            }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn register_reports_every_invalid_field() {
        let server = get_test_server();

        let response = server
            .post("/auth/register")
            .json(&json!({
                "email": "not-an-email",
                "password": "short",
                "name": "",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let fields: Vec<&str> = body["error"]["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|detail| detail["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, ["email", "password", "name"]);
    }
}
