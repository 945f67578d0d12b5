//! The transaction delete endpoint.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::{AppState, Error, auth::token::Claims, transaction::db::delete_transaction};

/// The body returned after a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteTransactionResponse {
    /// A confirmation message.
    pub message: &'static str,
}

/// A route handler for deleting one of the signed-in user's transactions.
pub async fn delete_transaction_by_id(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<String>,
) -> Result<Json<DeleteTransactionResponse>, Error> {
    delete_transaction(&claims.user_id, &transaction_id, &state.store)?;

    Ok(Json(DeleteTransactionResponse {
        message: "Transaction deleted successfully",
    }))
}
