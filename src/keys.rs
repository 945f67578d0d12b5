//! The single-table key design.
//!
//! Every record belonging to a user lives in the partition `USER#<userId>`,
//! and the sort key encodes the record type plus its ordering fields. This
//! lets one table answer "all transactions", "transactions in a date window",
//! "all budgets for a month", and "exact entity" queries with nothing but
//! prefix and range scans over the sort key.
//!
//! Changing any of these formats silently breaks the query patterns for
//! existing stored data, so treat them as part of the storage schema.

/// Sentinel used as the upper bound of a date range scan when the client
/// omits the end date.
pub const MAX_DATE: &str = "9999-12-31T23:59:59Z";

/// The sort key prefix shared by all of a user's transactions.
pub const TRANSACTION_PREFIX: &str = "TRANSACTION#";

/// The partition key for all records belonging to `user_id`.
pub fn user_pk(user_id: &str) -> String {
    format!("USER#{user_id}")
}

/// The sort key of the user record itself.
///
/// Identical to [user_pk] so the user record is a point read at
/// `(USER#<id>, USER#<id>)`.
pub fn user_sk(user_id: &str) -> String {
    format!("USER#{user_id}")
}

/// The key of the email lookup record mapping an email address to a user ID.
///
/// Used as both partition and sort key. The email must already be lowercased.
pub fn email_key(email: &str) -> String {
    format!("EMAIL#{email}")
}

/// The sort key for a transaction, ordered by date then ID.
pub fn transaction_sk(date: &str, transaction_id: &str) -> String {
    format!("TRANSACTION#{date}#{transaction_id}")
}

/// The lower/upper bound of a transaction date range scan.
pub fn transaction_date_bound(date: &str) -> String {
    format!("TRANSACTION#{date}")
}

/// The sort key for a budget, ordered by month then category.
pub fn budget_sk(month: &str, category: &str) -> String {
    format!("BUDGET#{month}#{category}")
}

/// The sort key prefix shared by all of a user's budgets for `month`.
pub fn budget_month_prefix(month: &str) -> String {
    format!("BUDGET#{month}#")
}
