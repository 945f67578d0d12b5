//! Setting monthly spending budgets and reporting progress against them.

pub mod create;
pub mod db;
pub mod list;
pub mod models;
pub mod progress;

pub use create::create_budget;
pub use list::get_budgets;
pub use models::{Budget, Period};
pub use progress::{BudgetProgress, budget_progress};
