//! The single transaction endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, Error, auth::token::Claims, transaction::db::get_transaction,
    transaction::models::Transaction,
};

/// A route handler for fetching one of the signed-in user's transactions.
pub async fn get_transaction_by_id(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, Error> {
    let (_, transaction) = get_transaction(&claims.user_id, &transaction_id, &state.store)?;

    Ok(Json(transaction))
}
