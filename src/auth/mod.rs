//! User registration, login, and token refresh.

pub mod log_in;
pub mod refresh;
pub mod register;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::{auth::token::TokenPair, user::PublicUser};

pub use log_in::post_log_in;
pub use refresh::refresh_tokens;
pub use register::register_user;

/// The body returned by the register and login endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: PublicUser,
    /// A freshly issued token pair.
    pub tokens: TokenPair,
}
