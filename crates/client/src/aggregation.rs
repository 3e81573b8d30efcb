//! Per-category totals for the distribution chart.

use api_types::{Money, transaction::Transaction};

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    /// Share of the grand total, `0.0..=100.0`.
    pub percentage: f64,
}

impl CategoryTotal {
    /// Percentage with one decimal, e.g. `40.0%`.
    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    #[error("category totals are too large to add up")]
    Overflow,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CategoryBreakdown {
    NoData,
    Totals {
        categories: Vec<CategoryTotal>,
        total: Money,
    },
}

/// Groups `transactions` by category, keeping the order in which categories
/// first appear.
pub fn breakdown(transactions: &[Transaction]) -> Result<CategoryBreakdown, AggregationError> {
    if transactions.is_empty() {
        return Ok(CategoryBreakdown::NoData);
    }

    let mut sums: Vec<(String, Money)> = Vec::new();
    for tx in transactions {
        match sums.iter_mut().find(|(category, _)| *category == tx.category) {
            Some((_, sum)) => {
                *sum = sum
                    .checked_add(tx.amount)
                    .ok_or(AggregationError::Overflow)?;
            }
            None => sums.push((tx.category.clone(), tx.amount)),
        }
    }

    let total = sums
        .iter()
        .try_fold(Money::ZERO, |acc, (_, sum)| acc.checked_add(*sum))
        .ok_or(AggregationError::Overflow)?;
    let categories = sums
        .into_iter()
        .map(|(category, sum)| CategoryTotal {
            category,
            total: sum,
            percentage: if total.is_zero() {
                0.0
            } else {
                sum.cents() as f64 / total.cents() as f64 * 100.0
            },
        })
        .collect();

    Ok(CategoryBreakdown::Totals { categories, total })
}

#[cfg(test)]
mod tests {
    use api_types::transaction::TransactionType;
    use chrono::NaiveDate;

    use super::*;
    use crate::validation::TransactionDraft;

    fn tx(category: &str, amount: i64) -> Transaction {
        Transaction {
            id: format!("{category}-{amount}"),
            amount: Money::new(amount * 100),
            category: category.to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            kind: TransactionType::Outcome,
        }
    }

    #[test]
    fn empty_list_has_no_data() {
        assert_eq!(breakdown(&[]), Ok(CategoryBreakdown::NoData));
    }

    #[test]
    fn sums_per_category_in_first_seen_order() {
        let result = breakdown(&[tx("A", 10), tx("B", 30), tx("A", 10)]).unwrap();

        let CategoryBreakdown::Totals { categories, total } = result else {
            panic!("expected totals");
        };
        assert_eq!(total, Money::new(5_000));
        assert_eq!(categories.len(), 2);

        assert_eq!(categories[0].category, "A");
        assert_eq!(categories[0].total, Money::new(2_000));
        assert_eq!(categories[0].percentage_label(), "40.0%");

        assert_eq!(categories[1].category, "B");
        assert_eq!(categories[1].total, Money::new(3_000));
        assert_eq!(categories[1].percentage_label(), "60.0%");
    }

    #[test]
    fn single_category_is_everything() {
        let CategoryBreakdown::Totals { categories, .. } = breakdown(&[tx("Rent", 1500)]).unwrap() else {
            panic!("expected totals");
        };
        assert_eq!(categories[0].percentage_label(), "100.0%");
    }

    #[test]
    fn zero_total_does_not_divide_by_zero() {
        let CategoryBreakdown::Totals { categories, total } = breakdown(&[tx("Free", 0)]).unwrap() else {
            panic!("expected totals");
        };
        assert!(total.is_zero());
        assert_eq!(categories[0].percentage, 0.0);
    }

    #[test]
    fn overflowing_totals_are_reported() {
        let draft = TransactionDraft {
            amount: "90000000000000000".to_string(),
            category: "Huge".to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 12, 1),
        };
        let valid = draft.validate().unwrap();
        let mut huge = tx("Huge", 0);
        huge.amount = valid.amount;

        assert_eq!(
            breakdown(&[huge.clone(), huge.clone()]),
            Err(AggregationError::Overflow)
        );

        let mut other = huge.clone();
        other.category = "Other".to_string();
        assert_eq!(breakdown(&[huge, other]), Err(AggregationError::Overflow));
    }
}
