//! Route paths for the API.

/// Register a new user.
pub const REGISTER: &str = "/auth/register";
/// Sign in with an email and password.
pub const LOG_IN: &str = "/auth/login";
/// Exchange a refresh token for a new token pair.
pub const REFRESH: &str = "/auth/refresh";
/// Create and list transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// Fetch, update, or delete one transaction.
pub const TRANSACTION: &str = "/transactions/{id}";
/// Create and list budgets.
pub const BUDGETS: &str = "/budgets";
