//! Recording, querying, and editing transactions.

pub mod create;
pub mod db;
pub mod delete;
pub mod get;
pub mod list;
pub mod models;
pub mod update;

pub use create::create_transaction;
pub use delete::delete_transaction_by_id;
pub use get::get_transaction_by_id;
pub use list::get_transactions;
pub use models::{Category, Transaction};
pub use update::update_transaction;
