//! Demo data for a fresh store.

use api_types::Money;
use chrono::NaiveDate;

use crate::{NewTransaction, TransactionKind};

/// Returns the sample transactions a demo deployment starts with.
///
/// Two incomes (salary, freelance) and three outcomes (rent, groceries,
/// entertainment) dated December 2025.
pub fn sample_transactions() -> Vec<NewTransaction> {
    [
        (5000, "Salary", "Monthly salary", 1, TransactionKind::Income),
        (1200, "Freelance", "Web development project", 15, TransactionKind::Income),
        (1500, "Rent", "Monthly rent payment", 5, TransactionKind::Outcome),
        (400, "Groceries", "Weekly shopping", 10, TransactionKind::Outcome),
        (200, "Entertainment", "Movie tickets and dinner", 12, TransactionKind::Outcome),
    ]
    .into_iter()
    .filter_map(|(amount, category, description, day, kind)| {
        Some(NewTransaction {
            amount: Money::new(amount * 100),
            category: category.to_string(),
            description: description.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, day)?,
            kind,
        })
    })
    .collect()
}
