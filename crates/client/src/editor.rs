//! Form state for creating or editing transactions of one type.
//!
//! ```text
//! Idle ──start_edit──▶ Editing(tx)
//!  ▲                     │
//!  └──cancel / saved─────┘
//! ```
//!
//! `submit` passes through `Submitting` and falls back to the previous state
//! on failure, keeping the draft.

use api_types::transaction::{NewTransaction, Transaction, TransactionType, TransactionUpdate};
use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    client::{ClientError, TransactionService},
    sync::TransactionsSync,
    validation::{TransactionDraft, ValidationErrors},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Editing(Transaction),
    Submitting,
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("a submission is already in flight")]
    Busy,
    #[error("cannot edit a {found} transaction in the {expected} editor")]
    KindMismatch {
        expected: TransactionType,
        found: TransactionType,
    },
    #[error("{0}")]
    Invalid(ValidationErrors),
    #[error(transparent)]
    Service(#[from] ClientError),
}

#[derive(Clone, Debug)]
pub struct Editor {
    kind: TransactionType,
    editing: Option<Transaction>,
    submitting: bool,
    draft: TransactionDraft,
    errors: ValidationErrors,
    last_error: Option<String>,
}

impl Editor {
    pub fn new(kind: TransactionType) -> Self {
        let draft = TransactionDraft::default();
        Self {
            kind,
            editing: None,
            submitting: false,
            errors: draft.errors(),
            draft,
            last_error: None,
        }
    }

    pub fn state(&self) -> EditorState {
        if self.submitting {
            return EditorState::Submitting;
        }
        match &self.editing {
            Some(tx) => EditorState::Editing(tx.clone()),
            None => EditorState::Idle,
        }
    }

    pub fn draft(&self) -> &TransactionDraft {
        &self.draft
    }

    /// Validation result of the current draft.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Message of the last failed submission, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && self.errors.is_empty()
    }

    pub fn start_edit(&mut self, tx: Transaction) -> Result<(), EditorError> {
        if self.submitting {
            return Err(EditorError::Busy);
        }
        if tx.kind != self.kind {
            return Err(EditorError::KindMismatch {
                expected: self.kind,
                found: tx.kind,
            });
        }

        self.set_draft(TransactionDraft::from_transaction(&tx));
        self.editing = Some(tx);
        self.last_error = None;
        Ok(())
    }

    pub fn cancel(&mut self) {
        if self.submitting {
            return;
        }
        self.editing = None;
        self.last_error = None;
        self.set_draft(TransactionDraft::default());
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.draft.amount = amount.into();
        self.revalidate();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.draft.category = category.into();
        self.revalidate();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
        self.revalidate();
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.draft.date = date;
        self.revalidate();
    }

    fn set_draft(&mut self, draft: TransactionDraft) {
        self.draft = draft;
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.errors = self.draft.errors();
    }

    /// Sends the draft as a create, or as an update when editing.
    ///
    /// Invalid drafts are never sent. On failure the draft and the edit
    /// target are kept and the message is available from [`last_error`].
    ///
    /// [`last_error`]: Editor::last_error
    pub async fn submit<S: TransactionService>(
        &mut self,
        sync: &TransactionsSync<S>,
    ) -> Result<Transaction, EditorError> {
        if self.submitting {
            return Err(EditorError::Busy);
        }
        let valid = self.draft.validate().map_err(EditorError::Invalid)?;

        let submitting = SubmittingFlag::raise(&mut self.submitting);
        let result = match &self.editing {
            None => {
                sync.create(NewTransaction {
                    amount: valid.amount,
                    category: valid.category,
                    description: valid.description,
                    date: valid.date,
                    kind: self.kind,
                })
                .await
            }
            Some(tx) => {
                sync.update(
                    &tx.id,
                    TransactionUpdate {
                        amount: Some(valid.amount),
                        category: Some(valid.category),
                        description: Some(valid.description),
                        date: Some(valid.date),
                        kind: Some(self.kind),
                        id: None,
                    },
                )
                .await
            }
        };
        drop(submitting);

        match result {
            Ok(tx) => {
                self.editing = None;
                self.last_error = None;
                self.set_draft(TransactionDraft::default());
                Ok(tx)
            }
            Err(err) => {
                tracing::error!("failed to save {} transaction: {err}", self.kind);
                self.last_error = Some(err.to_string());
                Err(EditorError::Service(err))
            }
        }
    }
}

/// Raises `Editor::submitting` for the lifetime of a submission. The flag is
/// lowered on drop, also when the `submit` future is cancelled.
struct SubmittingFlag<'a>(&'a mut bool);

impl<'a> SubmittingFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for SubmittingFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[cfg(test)]
mod tests {
    use api_types::Money;

    use super::*;

    fn rent() -> Transaction {
        Transaction {
            id: "3".to_string(),
            amount: Money::new(150_000),
            category: "Rent".to_string(),
            description: "Monthly rent payment".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 5).unwrap(),
            kind: TransactionType::Outcome,
        }
    }

    #[test]
    fn starts_idle_with_invalid_empty_draft() {
        let editor = Editor::new(TransactionType::Outcome);
        assert_eq!(editor.state(), EditorState::Idle);
        assert!(!editor.can_submit());
        assert_eq!(editor.errors().len(), 3);
    }

    #[test]
    fn revalidates_on_every_change() {
        let mut editor = Editor::new(TransactionType::Income);
        editor.set_amount("100");
        editor.set_category("Salary");
        assert!(!editor.can_submit());

        editor.set_date(NaiveDate::from_ymd_opt(2025, 1, 1));
        assert!(editor.can_submit());

        editor.set_amount("0");
        assert!(!editor.can_submit());
    }

    #[test]
    fn edit_prefills_and_cancel_resets() {
        let mut editor = Editor::new(TransactionType::Outcome);
        editor.start_edit(rent()).unwrap();

        assert_eq!(editor.state(), EditorState::Editing(rent()));
        assert_eq!(editor.draft().amount, "1500.00");
        assert_eq!(editor.draft().category, "Rent");
        assert!(editor.can_submit());

        editor.cancel();
        assert_eq!(editor.state(), EditorState::Idle);
        assert_eq!(editor.draft(), &TransactionDraft::default());
    }

    #[test]
    fn submitting_flag_is_lowered_on_drop() {
        let mut editor = Editor::new(TransactionType::Outcome);
        editor.start_edit(rent()).unwrap();

        let flag = SubmittingFlag::raise(&mut editor.submitting);
        drop(flag);

        assert_eq!(editor.state(), EditorState::Editing(rent()));
        assert!(editor.can_submit());
    }

    #[test]
    fn refuses_to_edit_other_type() {
        let mut editor = Editor::new(TransactionType::Income);
        let err = editor.start_edit(rent()).unwrap_err();
        assert!(matches!(
            err,
            EditorError::KindMismatch {
                expected: TransactionType::Income,
                found: TransactionType::Outcome,
            }
        ));
        assert_eq!(editor.state(), EditorState::Idle);
    }
}
