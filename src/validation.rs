//! Field validators shared by the request schemas.
//!
//! Each request type collects an entry for every violated field into a
//! [crate::error::FieldError] list, so clients see all problems at once
//! instead of one per round trip.

use email_address::EmailAddress;

use crate::dates;

/// The ISO 4217 currency codes the application accepts.
pub const SUPPORTED_CURRENCIES: [&str; 6] = ["USD", "EUR", "GBP", "JPY", "CAD", "AUD"];

/// The currency assumed when a request omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// The maximum length of a transaction description.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// The allowed length range of a password, inclusive.
pub const PASSWORD_LENGTH: std::ops::RangeInclusive<usize> = 8..=100;

/// The maximum length of a user's display name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Whether `email` is a syntactically valid email address.
pub fn is_valid_email(email: &str) -> bool {
    EmailAddress::is_valid(email)
}

/// Lowercase an email address for storage and lookups.
///
/// The email index record is keyed on the lowercased address, so every path
/// that touches it must normalize the same way.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Whether `currency` is one of the supported ISO 4217 codes.
pub fn is_supported_currency(currency: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&currency)
}

/// Whether `month` is a valid `YYYY-MM` string.
pub fn is_valid_month(month: &str) -> bool {
    dates::parse_month(month).is_some()
}

/// Whether `date` is a valid RFC 3339 datetime.
pub fn is_valid_datetime(date: &str) -> bool {
    dates::is_valid_datetime(date)
}

/// Whether `amount` is a positive, finite number.
pub fn is_positive_amount(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

/// Whether `url` looks like an HTTP(S) URL.
pub fn is_valid_url(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://"))
        && url.len() > "https://".len()
        && !url.contains(char::is_whitespace)
}
