//! The budget creation endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState, Error,
    auth::token::Claims,
    budget::{
        db::upsert_budget,
        models::{Budget, CreateBudgetRequest},
    },
    extract::AppJson,
};

/// A route handler for setting a budget for the signed-in user.
///
/// Setting a budget for a category and month that already has one replaces
/// it rather than failing.
pub async fn create_budget(
    State(state): State<AppState>,
    claims: Claims,
    AppJson(request): AppJson<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<Budget>), Error> {
    let budget = request.into_budget(&claims.user_id)?;

    upsert_budget(&budget, &state.store)?;

    Ok((StatusCode::CREATED, Json(budget)))
}
