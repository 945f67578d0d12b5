//! The transaction list endpoint.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::token::Claims,
    error::FieldError,
    pagination::{decode_cursor, encode_cursor},
    transaction::{
        db::list_transactions,
        models::{Category, Transaction},
    },
    validation::is_valid_datetime,
};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 100;

/// The query string of a transaction list request, before validation.
///
/// Everything arrives as text, so numeric fields are parsed during
/// validation to keep malformed values inside the field-error envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// Only include transactions dated on or after this RFC 3339 instant.
    pub start_date: Option<String>,
    /// Only include transactions dated on or before this RFC 3339 instant.
    pub end_date: Option<String>,
    /// Only include transactions in this category.
    pub category: Option<String>,
    /// Only include transactions of at least this amount.
    pub min_amount: Option<String>,
    /// Only include transactions of at most this amount.
    pub max_amount: Option<String>,
    /// How many records to scan, between 1 and 100. Defaults to 50.
    pub limit: Option<String>,
    /// An opaque cursor from a previous response.
    pub cursor: Option<String>,
}

struct ListFilters {
    category: Option<Category>,
    min_amount: Option<f64>,
    max_amount: Option<f64>,
    limit: usize,
    start_after: Option<String>,
}

impl ListTransactionsQuery {
    fn validate(&self) -> Result<ListFilters, Error> {
        let mut errors = Vec::new();

        if let Some(date) = &self.start_date
            && !is_valid_datetime(date)
        {
            errors.push(FieldError::new("startDate", "must be an RFC 3339 datetime"));
        }

        if let Some(date) = &self.end_date
            && !is_valid_datetime(date)
        {
            errors.push(FieldError::new("endDate", "must be an RFC 3339 datetime"));
        }

        let category = match &self.category {
            Some(name) => match Category::from_str(name) {
                Ok(category) => Some(category),
                Err(()) => {
                    errors.push(FieldError::new("category", "is not a valid category"));
                    None
                }
            },
            None => None,
        };

        let mut parse_amount = |field: &'static str, value: &Option<String>| match value {
            Some(text) => match text.parse::<f64>() {
                Ok(amount) if amount.is_finite() => Some(amount),
                _ => {
                    errors.push(FieldError::new(field, "must be a number"));
                    None
                }
            },
            None => None,
        };
        let min_amount = parse_amount("minAmount", &self.min_amount);
        let max_amount = parse_amount("maxAmount", &self.max_amount);

        let limit = match &self.limit {
            Some(text) => match text.parse::<usize>() {
                Ok(limit) if (1..=MAX_LIMIT).contains(&limit) => limit,
                _ => {
                    errors.push(FieldError::new("limit", "must be between 1 and 100"));
                    DEFAULT_LIMIT
                }
            },
            None => DEFAULT_LIMIT,
        };

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let start_after = match &self.cursor {
            Some(cursor) => Some(decode_cursor(cursor)?),
            None => None,
        };

        Ok(ListFilters {
            category,
            min_amount,
            max_amount,
            limit,
            start_after,
        })
    }
}

/// The body returned by the transaction list endpoint.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// The matching transactions, most recent first.
    pub transactions: Vec<Transaction>,
    /// How many transactions this page holds.
    pub count: usize,
    /// A cursor for the next page, present only when the scan filled its
    /// limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// A route handler for listing the signed-in user's transactions.
///
/// The date window bounds the key scan itself; category and amount filters
/// are applied to the scanned page afterwards. `limit` therefore caps
/// records scanned, not records returned, and a page can come back smaller
/// than the limit (or empty) while still carrying a cursor.
pub async fn get_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, Error> {
    let filters = query.validate()?;

    let page = list_transactions(
        &claims.user_id,
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        filters.limit,
        filters.start_after.as_deref(),
        &state.store,
    )?;

    let transactions: Vec<Transaction> = page
        .transactions
        .into_iter()
        .filter(|transaction| {
            filters
                .category
                .is_none_or(|category| transaction.category == category)
                && filters.min_amount.is_none_or(|min| transaction.amount >= min)
                && filters.max_amount.is_none_or(|max| transaction.amount <= max)
        })
        .collect();

    let count = transactions.len();

    Ok(Json(ListTransactionsResponse {
        transactions,
        count,
        cursor: page.last_key.as_deref().map(encode_cursor),
    }))
}
