//! The transaction record and its request schemas.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Error, dates,
    error::FieldError,
    validation::{
        DEFAULT_CURRENCY, MAX_DESCRIPTION_LENGTH, is_positive_amount, is_supported_currency,
        is_valid_datetime, is_valid_url,
    },
};

/// The spending categories a transaction can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Supermarket and grocery spending.
    Groceries,
    /// Power, water, internet, and similar bills.
    Utilities,
    /// Movies, games, events.
    Entertainment,
    /// Public transport, fuel, parking.
    Transportation,
    /// Medical and pharmacy costs.
    Healthcare,
    /// Eating out.
    Dining,
    /// General retail.
    Shopping,
    /// Money coming in rather than going out.
    Income,
    /// Anything that does not fit the other categories.
    Other,
}

impl Category {
    /// The lowercase name used in sort keys and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "groceries",
            Category::Utilities => "utilities",
            Category::Entertainment => "entertainment",
            Category::Transportation => "transportation",
            Category::Healthcare => "healthcare",
            Category::Dining => "dining",
            Category::Shopping => "shopping",
            Category::Income => "income",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "groceries" => Ok(Category::Groceries),
            "utilities" => Ok(Category::Utilities),
            "entertainment" => Ok(Category::Entertainment),
            "transportation" => Ok(Category::Transportation),
            "healthcare" => Ok(Category::Healthcare),
            "dining" => Ok(Category::Dining),
            "shopping" => Ok(Category::Shopping),
            "income" => Ok(Category::Income),
            "other" => Ok(Category::Other),
            _ => Err(()),
        }
    }
}

/// A transaction, as stored and as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The transaction's unique ID.
    pub id: String,
    /// The ID of the user the transaction belongs to.
    pub user_id: String,
    /// The amount of money, always positive; direction comes from the
    /// category (income vs. everything else).
    pub amount: f64,
    /// The ISO 4217 currency code.
    pub currency: String,
    /// The spending category.
    pub category: Category,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the transaction happened, as an RFC 3339 string. Also encoded in
    /// the record's sort key for ordering.
    pub date: String,
    /// A link to a receipt image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    /// When the record was created, as an RFC 3339 string.
    pub created_at: String,
    /// When the record was last updated, as an RFC 3339 string.
    pub updated_at: String,
}

/// The body of a transaction creation request, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// The amount of money, must be positive.
    pub amount: f64,
    /// The ISO 4217 currency code. Defaults to USD.
    pub currency: Option<String>,
    /// The spending category name.
    pub category: String,
    /// Free-text description, at most 500 characters.
    pub description: Option<String>,
    /// When the transaction happened, as an RFC 3339 string.
    pub date: String,
    /// A link to a receipt image.
    pub receipt_url: Option<String>,
}

impl CreateTransactionRequest {
    /// Check every field and build the stored record for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] listing each violated field.
    pub fn into_transaction(self, user_id: &str) -> Result<Transaction, Error> {
        let mut errors = Vec::new();

        if !is_positive_amount(self.amount) {
            errors.push(FieldError::new("amount", "must be a positive number"));
        }

        let currency = self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_owned());
        if !is_supported_currency(&currency) {
            errors.push(FieldError::new("currency", "is not a supported currency"));
        }

        let category = match Category::from_str(&self.category) {
            Ok(category) => Some(category),
            Err(()) => {
                errors.push(FieldError::new("category", "is not a valid category"));
                None
            }
        };

        if let Some(description) = &self.description
            && description.chars().count() > MAX_DESCRIPTION_LENGTH
        {
            errors.push(FieldError::new(
                "description",
                "must be at most 500 characters",
            ));
        }

        if !is_valid_datetime(&self.date) {
            errors.push(FieldError::new("date", "must be an RFC 3339 datetime"));
        }

        if let Some(url) = &self.receipt_url
            && !is_valid_url(url)
        {
            errors.push(FieldError::new("receiptUrl", "must be an HTTP(S) URL"));
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let now = dates::now_rfc3339();

        Ok(Transaction {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_owned(),
            amount: self.amount,
            currency,
            // Checked above, only reachable when errors is empty.
            category: category.expect("category was validated"),
            description: self.description,
            date: self.date,
            receipt_url: self.receipt_url,
            created_at: now.clone(),
            updated_at: now,
        })
    }
}

/// The body of a transaction update request: every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    /// Replacement amount.
    pub amount: Option<f64>,
    /// Replacement currency code.
    pub currency: Option<String>,
    /// Replacement category name.
    pub category: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement date.
    pub date: Option<String>,
    /// Replacement receipt URL.
    pub receipt_url: Option<String>,
}

impl UpdateTransactionRequest {
    /// Check the provided fields and apply them to `transaction`.
    ///
    /// The record keeps its sort key even if the date changes, matching the
    /// store's in-place update semantics; `updatedAt` is always bumped.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] listing each violated field.
    pub fn apply_to(self, transaction: &mut Transaction) -> Result<(), Error> {
        let mut errors = Vec::new();

        if let Some(amount) = self.amount {
            if is_positive_amount(amount) {
                transaction.amount = amount;
            } else {
                errors.push(FieldError::new("amount", "must be a positive number"));
            }
        }

        if let Some(currency) = self.currency {
            if is_supported_currency(&currency) {
                transaction.currency = currency;
            } else {
                errors.push(FieldError::new("currency", "is not a supported currency"));
            }
        }

        if let Some(category) = self.category {
            match Category::from_str(&category) {
                Ok(category) => transaction.category = category,
                Err(()) => errors.push(FieldError::new("category", "is not a valid category")),
            }
        }

        if let Some(description) = self.description {
            if description.chars().count() <= MAX_DESCRIPTION_LENGTH {
                transaction.description = Some(description);
            } else {
                errors.push(FieldError::new(
                    "description",
                    "must be at most 500 characters",
                ));
            }
        }

        if let Some(date) = self.date {
            if is_valid_datetime(&date) {
                transaction.date = date;
            } else {
                errors.push(FieldError::new("date", "must be an RFC 3339 datetime"));
            }
        }

        if let Some(url) = self.receipt_url {
            if is_valid_url(&url) {
                transaction.receipt_url = Some(url);
            } else {
                errors.push(FieldError::new("receiptUrl", "must be an HTTP(S) URL"));
            }
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        transaction.updated_at = dates::now_rfc3339();

        Ok(())
    }
}
