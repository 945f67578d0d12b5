//! Budget progress: how much of each budget a month's spending has used.

use serde::Serialize;

use crate::{budget::models::Budget, transaction::Transaction};

/// A budget joined with the month's spending against it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    /// The budget itself, flattened into the same object.
    #[serde(flatten)]
    pub budget: Budget,
    /// The total spent in the budget's category this month.
    pub spent: f64,
    /// How much of the limit is left. Negative when overspent.
    pub remaining: f64,
    /// Spending as a percentage of the limit, unclamped.
    pub percentage: f64,
}

/// Join `budget` with the month's `transactions`.
///
/// Only transactions in the budget's category count towards `spent`; the
/// caller supplies all transactions dated within the budget's month.
pub fn budget_progress(budget: Budget, transactions: &[Transaction]) -> BudgetProgress {
    let spent: f64 = transactions
        .iter()
        .filter(|transaction| transaction.category == budget.category)
        .map(|transaction| transaction.amount)
        .sum();

    let remaining = budget.limit - spent;
    // Limits are validated as positive, but guard anyway since a zero limit
    // would make the percentage meaningless.
    let percentage = if budget.limit > 0.0 {
        spent / budget.limit * 100.0
    } else {
        0.0
    };

    BudgetProgress {
        budget,
        spent,
        remaining,
        percentage,
    }
}

impl BudgetProgress {
    /// The percentage clamped to 100, for progress bars that should fill but
    /// never overflow.
    pub fn display_percentage(&self) -> f64 {
        self.percentage.min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        budget::models::{Budget, Period},
        transaction::{Category, Transaction},
    };

    use super::budget_progress;

    fn budget(category: Category, limit: f64) -> Budget {
        Budget {
            id: "b-1".to_owned(),
            user_id: "user-1".to_owned(),
            category,
            limit,
            currency: "USD".to_owned(),
            period: Period::Monthly,
            month: "2024-01".to_owned(),
            created_at: "2024-01-01T00:00:00Z".to_owned(),
            updated_at: "2024-01-01T00:00:00Z".to_owned(),
        }
    }

    fn transaction(amount: f64, category: Category) -> Transaction {
        Transaction {
            id: "t-1".to_owned(),
            user_id: "user-1".to_owned(),
            amount,
            currency: "USD".to_owned(),
            category,
            description: None,
            date: "2024-01-15T00:00:00Z".to_owned(),
            receipt_url: None,
            created_at: "2024-01-15T00:00:00Z".to_owned(),
            updated_at: "2024-01-15T00:00:00Z".to_owned(),
        }
    }

    #[test]
    fn spent_sums_only_the_budgets_category() {
        let transactions = vec![
            transaction(42.5, Category::Dining),
            transaction(10.0, Category::Dining),
            transaction(99.0, Category::Groceries),
        ];

        let progress = budget_progress(budget(Category::Dining, 200.0), &transactions);

        assert_eq!(progress.spent, 52.5);
        assert_eq!(progress.remaining, 147.5);
        assert_eq!(progress.percentage, 26.25);
    }

    #[test]
    fn no_transactions_means_zero_progress() {
        let progress = budget_progress(budget(Category::Dining, 200.0), &[]);

        assert_eq!(progress.spent, 0.0);
        assert_eq!(progress.remaining, 200.0);
        assert_eq!(progress.percentage, 0.0);
    }

    #[test]
    fn overspending_exceeds_one_hundred_percent_but_displays_clamped() {
        let transactions = vec![transaction(250.0, Category::Dining)];

        let progress = budget_progress(budget(Category::Dining, 200.0), &transactions);

        assert_eq!(progress.percentage, 125.0);
        assert_eq!(progress.remaining, -50.0);
        assert_eq!(progress.display_percentage(), 100.0);
    }

    #[test]
    fn progress_serializes_budget_fields_inline() {
        let progress = budget_progress(budget(Category::Dining, 200.0), &[]);

        let json = serde_json::to_value(&progress).unwrap();

        assert_eq!(json["category"], "dining");
        assert_eq!(json["limit"], 200.0);
        assert_eq!(json["spent"], 0.0);
        assert_eq!(json["remaining"], 200.0);
        assert_eq!(json["percentage"], 0.0);
    }
}
