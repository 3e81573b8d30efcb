use std::fmt;

use api_types::{Money, ParseMoneyError, transaction::Transaction};
use chrono::NaiveDate;
use thiserror::Error;

const MIN_AMOUNT: Money = Money::new(1);

/// Form input for one transaction, as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionDraft {
    pub amount: String,
    pub category: String,
    pub description: String,
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Amount,
    Category,
    Date,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("amount must be a number")]
    AmountNotANumber,
    #[error("amount must be at least 0.01")]
    AmountTooSmall,
    #[error("amount can have at most two decimals")]
    AmountPrecision,
    #[error("category is required")]
    CategoryRequired,
    #[error("date is required")]
    DateRequired,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            Self::AmountNotANumber | Self::AmountTooSmall | Self::AmountPrecision => Field::Amount,
            Self::CategoryRequired => Field::Category,
            Self::DateRequired => Field::Date,
        }
    }
}

/// Every failed rule of a draft, at most one per field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|err| err.field() == field)
    }

    pub fn contains(&self, err: &FieldError) -> bool {
        self.0.contains(err)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A draft that passed every rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidDraft {
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

fn check_amount(input: &str) -> Result<Money, FieldError> {
    let amount = input.parse::<Money>().map_err(|err| match err {
        ParseMoneyError::TooManyDecimals => FieldError::AmountPrecision,
        ParseMoneyError::Empty | ParseMoneyError::Invalid | ParseMoneyError::Overflow => {
            FieldError::AmountNotANumber
        }
    })?;

    if amount < MIN_AMOUNT {
        return Err(FieldError::AmountTooSmall);
    }
    Ok(amount)
}

impl TransactionDraft {
    /// Draft prefilled from a stored transaction, for editing.
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            amount: tx.amount.to_string(),
            category: tx.category.clone(),
            description: tx.description.clone(),
            date: Some(tx.date),
        }
    }

    pub fn errors(&self) -> ValidationErrors {
        match self.validate() {
            Ok(_) => ValidationErrors::default(),
            Err(errors) => errors,
        }
    }

    pub fn validate(&self) -> Result<ValidDraft, ValidationErrors> {
        let mut errors = Vec::new();

        let amount = check_amount(&self.amount).map_err(|err| errors.push(err)).ok();

        let category = self.category.trim();
        if category.is_empty() {
            errors.push(FieldError::CategoryRequired);
        }

        if self.date.is_none() {
            errors.push(FieldError::DateRequired);
        }

        match (amount, self.date) {
            (Some(amount), Some(date)) if errors.is_empty() => Ok(ValidDraft {
                amount,
                category: category.to_string(),
                description: self.description.clone(),
                date,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(amount: &str) -> TransactionDraft {
        TransactionDraft {
            amount: amount.to_string(),
            category: "Groceries".to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 12, 10),
        }
    }

    #[test]
    fn accepts_smallest_amount() {
        let valid = draft("0.01").validate().unwrap();
        assert_eq!(valid.amount, Money::new(1));
        assert_eq!(valid.category, "Groceries");
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        for amount in ["0", "-5", "0.00"] {
            let errors = draft(amount).validate().unwrap_err();
            assert_eq!(
                errors.get(Field::Amount),
                Some(&FieldError::AmountTooSmall),
                "{amount}"
            );
        }
    }

    #[test]
    fn rejects_non_numbers_and_extra_decimals() {
        assert_eq!(
            draft("abc").errors().get(Field::Amount),
            Some(&FieldError::AmountNotANumber)
        );
        assert_eq!(
            draft("").errors().get(Field::Amount),
            Some(&FieldError::AmountNotANumber)
        );
        assert_eq!(
            draft("1.234").errors().get(Field::Amount),
            Some(&FieldError::AmountPrecision)
        );
        assert!(draft("12,50").validate().is_ok());
    }

    #[test]
    fn rejects_blank_category_and_missing_date() {
        let mut bad = draft("10");
        bad.category = "   ".to_string();
        bad.date = None;

        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&FieldError::CategoryRequired));
        assert!(errors.contains(&FieldError::DateRequired));
        assert_eq!(errors.to_string(), "category is required, date is required");
    }

    #[test]
    fn description_is_unconstrained() {
        let mut ok = draft("10");
        ok.description = "x".repeat(1000);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn prefills_from_transaction() {
        let tx = Transaction {
            id: "1".to_string(),
            amount: Money::new(40_050),
            category: "Groceries".to_string(),
            description: "Weekly shopping".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 10).unwrap(),
            kind: api_types::transaction::TransactionType::Outcome,
        };
        let draft = TransactionDraft::from_transaction(&tx);
        assert_eq!(draft.amount, "400.50");
        assert_eq!(draft.validate().unwrap().amount, tx.amount);
    }
}
