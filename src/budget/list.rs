//! The budget list endpoint, with per-budget spending progress.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::token::Claims,
    budget::{
        db::list_budgets,
        progress::{BudgetProgress, budget_progress},
    },
    dates,
    error::FieldError,
    transaction::db::transactions_in_range,
    validation::is_valid_month,
};

/// The query string of a budget list request.
#[derive(Debug, Default, Deserialize)]
pub struct ListBudgetsQuery {
    /// The `YYYY-MM` month to report on. Defaults to the current month.
    pub month: Option<String>,
}

/// The body returned by the budget list endpoint.
#[derive(Debug, Serialize)]
pub struct ListBudgetsResponse {
    /// The month's budgets, each with its spending progress.
    pub budgets: Vec<BudgetProgress>,
    /// How many budgets the month has.
    pub count: usize,
}

/// A route handler for listing the signed-in user's budgets for a month.
///
/// Each budget comes back joined with the month's spending in its category,
/// computed from the transactions dated within the month.
pub async fn get_budgets(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<ListBudgetsQuery>,
) -> Result<Json<ListBudgetsResponse>, Error> {
    let month = query.month.unwrap_or_else(dates::current_month);
    if !is_valid_month(&month) {
        return Err(Error::Validation(vec![FieldError::new(
            "month",
            "must be a YYYY-MM month",
        )]));
    }

    let budgets = list_budgets(&claims.user_id, &month, &state.store)?;

    // Both bounds exist whenever the month validated.
    let (Some(start), Some(end)) = (dates::month_start(&month), dates::month_end(&month)) else {
        return Ok(Json(ListBudgetsResponse {
            budgets: Vec::new(),
            count: 0,
        }));
    };

    let transactions = transactions_in_range(&claims.user_id, &start, &end, &state.store)?;

    let budgets: Vec<BudgetProgress> = budgets
        .into_iter()
        .map(|budget| budget_progress(budget, &transactions))
        .collect();
    let count = budgets.len();

    Ok(Json(ListBudgetsResponse { budgets, count }))
}
