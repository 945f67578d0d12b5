//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};

/// How many body bytes to include in `info` level logs before truncating.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The JSON fields that must never reach the logs in clear text.
const SENSITIVE_FIELDS: [&str; 2] = ["password", "refreshToken"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level. Credential fields in
/// JSON request bodies are redacted before logging.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = extract_parts_and_body_text_from_request(request).await;

    let is_json = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if is_json {
        log_request(&parts, &redact_fields(&body_text, &SENSITIVE_FIELDS));
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body_text) = extract_parts_and_body_text_from_response(response).await;
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

/// Replace the values of `fields` in a JSON object with asterisks.
///
/// Bodies that do not parse as a JSON object are returned unchanged; the
/// deserialization error they cause downstream will not contain the body.
fn redact_fields(body_text: &str, fields: &[&str]) -> String {
    let Ok(mut value) = serde_json::from_str::<serde_json::Value>(body_text) else {
        return body_text.to_owned();
    };

    let Some(object) = value.as_object_mut() else {
        return body_text.to_owned();
    };

    for field in fields {
        if let Some(entry) = object.get_mut(*field) {
            *entry = serde_json::Value::String("********".to_owned());
        }
    }

    value.to_string()
}

async fn extract_parts_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_parts_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod tests {
    use super::redact_fields;

    #[test]
    fn redacts_password_and_refresh_token() {
        let body = r#"{"email":"foo@bar.baz","password":"hunter2!","refreshToken":"abc.def.ghi"}"#;

        let redacted = redact_fields(body, &["password", "refreshToken"]);

        assert!(!redacted.contains("hunter2!"));
        assert!(!redacted.contains("abc.def.ghi"));
        assert!(redacted.contains("foo@bar.baz"));
        assert!(redacted.contains("********"));
    }

    #[test]
    fn leaves_bodies_without_sensitive_fields_alone() {
        let body = r#"{"amount":42.5,"category":"dining"}"#;

        let redacted = redact_fields(body, &["password"]);

        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&redacted).unwrap(),
            serde_json::from_str::<serde_json::Value>(body).unwrap()
        );
    }

    #[test]
    fn passes_non_json_bodies_through() {
        assert_eq!(redact_fields("not json", &["password"]), "not json");
    }
}
