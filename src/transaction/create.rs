//! The transaction creation endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState, Error,
    auth::token::Claims,
    extract::AppJson,
    transaction::{
        db::insert_transaction,
        models::{CreateTransactionRequest, Transaction},
    },
};

/// A route handler for recording a new transaction for the signed-in user.
pub async fn create_transaction(
    State(state): State<AppState>,
    claims: Claims,
    AppJson(request): AppJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let transaction = request.into_transaction(&claims.user_id)?;

    insert_transaction(&transaction, &state.store)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
