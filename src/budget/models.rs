//! The budget record and its request schema.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Error, dates,
    error::FieldError,
    transaction::Category,
    validation::{
        DEFAULT_CURRENCY, is_positive_amount, is_supported_currency, is_valid_month,
    },
};

/// How often a budget resets.
///
/// Only monthly budgets drive progress reporting; the other periods are
/// stored as metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Resets each calendar month.
    Monthly,
    /// Resets each week.
    Weekly,
    /// Resets each calendar year.
    Yearly,
}

/// A spending budget for one category in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The budget's unique ID.
    pub id: String,
    /// The ID of the user the budget belongs to.
    pub user_id: String,
    /// The category the budget caps.
    pub category: Category,
    /// The spending cap.
    pub limit: f64,
    /// The ISO 4217 currency code.
    pub currency: String,
    /// How often the budget resets.
    pub period: Period,
    /// The `YYYY-MM` month the budget applies to.
    pub month: String,
    /// When the record was created, as an RFC 3339 string.
    pub created_at: String,
    /// When the record was last updated, as an RFC 3339 string.
    pub updated_at: String,
}

/// The body of a budget creation request, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    /// The category to cap.
    pub category: String,
    /// The spending cap, must be positive.
    pub limit: f64,
    /// The ISO 4217 currency code. Defaults to USD.
    pub currency: Option<String>,
    /// How often the budget resets. Defaults to monthly.
    pub period: Option<String>,
    /// The `YYYY-MM` month the budget applies to. Defaults to the current
    /// month.
    pub month: Option<String>,
}

impl CreateBudgetRequest {
    /// Check every field and build the stored record for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] listing each violated field.
    pub fn into_budget(self, user_id: &str) -> Result<Budget, Error> {
        let mut errors = Vec::new();

        let category = match Category::from_str(&self.category) {
            Ok(category) => Some(category),
            Err(()) => {
                errors.push(FieldError::new("category", "is not a valid category"));
                None
            }
        };

        if !is_positive_amount(self.limit) {
            errors.push(FieldError::new("limit", "must be a positive number"));
        }

        let currency = self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_owned());
        if !is_supported_currency(&currency) {
            errors.push(FieldError::new("currency", "is not a supported currency"));
        }

        let period = match self.period.as_deref() {
            None | Some("monthly") => Period::Monthly,
            Some("weekly") => Period::Weekly,
            Some("yearly") => Period::Yearly,
            Some(_) => {
                errors.push(FieldError::new("period", "is not a valid period"));
                Period::Monthly
            }
        };

        let month = self.month.unwrap_or_else(dates::current_month);
        if !is_valid_month(&month) {
            errors.push(FieldError::new("month", "must be a YYYY-MM month"));
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let now = dates::now_rfc3339();

        Ok(Budget {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_owned(),
            // Checked above, only reachable when errors is empty.
            category: category.expect("category was validated"),
            limit: self.limit,
            currency,
            period,
            month,
            created_at: now.clone(),
            updated_at: now,
        })
    }
}
