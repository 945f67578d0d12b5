//! Database functions for budgets.

use crate::{
    Error,
    budget::models::Budget,
    keys::{budget_month_prefix, budget_sk, user_pk},
    store::{Item, SingleTable, SortOrder},
};

fn from_item(item: &Item) -> Result<Budget, Error> {
    serde_json::from_str(&item.payload)
        .map_err(|error| Error::PayloadSerialization(error.to_string()))
}

/// Write `budget` at its month/category sort key.
///
/// A user has at most one budget per category per month, so writing a second
/// budget for the same pair replaces the first.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn upsert_budget(budget: &Budget, store: &SingleTable) -> Result<(), Error> {
    let payload = serde_json::to_string(budget)
        .map_err(|error| Error::PayloadSerialization(error.to_string()))?;

    store.put(&Item {
        pk: user_pk(&budget.user_id),
        sk: budget_sk(&budget.month, budget.category.as_str()),
        payload,
    })
}

/// All of `user_id`'s budgets for `month`, in category order.
///
/// # Errors
///
/// Returns an error if the scan or deserialization fails.
pub fn list_budgets(user_id: &str, month: &str, store: &SingleTable) -> Result<Vec<Budget>, Error> {
    let page = store.query_prefix(
        &user_pk(user_id),
        &budget_month_prefix(month),
        SortOrder::Ascending,
        None,
        None,
    )?;

    page.items.iter().map(from_item).collect()
}
