//! The transaction update endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, Error,
    auth::token::Claims,
    extract::AppJson,
    transaction::{
        db::{get_transaction, update_transaction_at},
        models::{Transaction, UpdateTransactionRequest},
    },
};

/// A route handler for updating one of the signed-in user's transactions.
///
/// The record is rewritten at its existing sort key, so changing the date
/// updates the stored field without re-ordering the record in date scans.
pub async fn update_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<String>,
    AppJson(request): AppJson<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, Error> {
    let (sk, mut transaction) = get_transaction(&claims.user_id, &transaction_id, &state.store)?;

    request.apply_to(&mut transaction)?;

    update_transaction_at(&sk, &transaction, &state.store)?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_utils::{get_test_server, register_and_log_in};

    #[tokio::test]
    async fn update_changes_only_the_given_fields() {
        let server = get_test_server();
        let token = register_and_log_in(&server).await;

        let created: serde_json::Value = server
            .post("/transactions")
            .authorization_bearer(&token)
            .json(&json!({
                "amount": 42.50,
                "category": "dining",
                "description": "Rust Pie",
                "date": "2024-01-15T00:00:00Z",
            }))
            .await
            .json();
        let id = created["id"].as_str().unwrap();

        let response = server
            .put(&format!("/transactions/{id}"))
            .authorization_bearer(&token)
            .json(&json!({ "amount": 50.0 }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["amount"], 50.0);
        assert_eq!(body["category"], "dining");
        assert_eq!(body["description"], "Rust Pie");
        assert_eq!(body["createdAt"], created["createdAt"]);
    }

    #[tokio::test]
    async fn updated_transaction_is_what_get_returns() {
        let server = get_test_server();
        let token = register_and_log_in(&server).await;

        let created: serde_json::Value = server
            .post("/transactions")
            .authorization_bearer(&token)
            .json(&json!({
                "amount": 42.50,
                "category": "dining",
                "date": "2024-01-15T00:00:00Z",
            }))
            .await
            .json();
        let id = created["id"].as_str().unwrap();

        server
            .put(&format!("/transactions/{id}"))
            .authorization_bearer(&token)
            .json(&json!({ "category": "groceries" }))
            .await
            .assert_status_ok();

        let got: serde_json::Value = server
            .get(&format!("/transactions/{id}"))
            .authorization_bearer(&token)
            .await
            .json();

        assert_eq!(got["category"], "groceries");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let server = get_test_server();
        let token = register_and_log_in(&server).await;

        server
            .put("/transactions/nope")
            .authorization_bearer(&token)
            .json(&json!({ "amount": 50.0 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_rejects_invalid_fields() {
        let server = get_test_server();
        let token = register_and_log_in(&server).await;

        let created: serde_json::Value = server
            .post("/transactions")
            .authorization_bearer(&token)
            .json(&json!({
                "amount": 42.50,
                "category": "dining",
                "date": "2024-01-15T00:00:00Z",
            }))
            .await
            .json();
        let id = created["id"].as_str().unwrap();

        let response = server
            .put(&format!("/transactions/{id}"))
            .authorization_bearer(&token)
            .json(&json!({ "currency": "BTC" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
