use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::ids::{AccountId, ScheduledTransactionId, TransactionId};
use super::schedule::Schedule;
use crate::error::InvariantViolation;

/// Tag on transactions produced by the interest model
pub const INTEREST: &str = "interest";
/// Tag on transactions moving money into or out of a pending-interest account
pub const PENDING_INTEREST: &str = "pending-interest";

/// What a transaction moves, independent of when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    /// Integer minor units
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: String,
}

impl TransactionDetails {
    pub fn new(
        from: impl Into<AccountId>,
        to: impl Into<AccountId>,
        amount: i64,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            from_account_id: from.into(),
            to_account_id: to.into(),
            amount,
            kind: kind.into(),
            label: String::new(),
        }
    }

    #[must_use]
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Checks the fields every posting needs.
    pub fn validate(&self, entity: &'static str) -> Result<(), InvariantViolation> {
        if self.from_account_id.is_empty() {
            return Err(InvariantViolation::MissingField {
                entity,
                field: "fromAccountId",
            });
        }
        if self.to_account_id.is_empty() {
            return Err(InvariantViolation::MissingField {
                entity,
                field: "toAccountId",
            });
        }
        if self.amount < 0 {
            return Err(InvariantViolation::NegativeAmount {
                entity,
                amount: self.amount,
            });
        }
        Ok(())
    }

    /// Like [`validate`](Self::validate), additionally requiring a label.
    pub fn validate_labelled(&self, entity: &'static str) -> Result<(), InvariantViolation> {
        self.validate(entity)?;
        if self.label.trim().is_empty() {
            return Err(InvariantViolation::MissingField {
                entity,
                field: "label",
            });
        }
        Ok(())
    }

    /// Signed contribution of this transfer to `account`.
    pub fn signed_amount_for(&self, account: &AccountId) -> i64 {
        if &self.to_account_id == account {
            self.amount
        } else if &self.from_account_id == account {
            -self.amount
        } else {
            0
        }
    }

    pub fn touches(&self, account: &AccountId) -> bool {
        &self.to_account_id == account || &self.from_account_id == account
    }
}

/// A posted, immutable ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(flatten)]
    pub details: TransactionDetails,
    pub occured_on: Date,
}

/// A template replayed into the ledger whenever its schedule fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTransaction {
    pub id: ScheduledTransactionId,
    pub created_on: Date,
    pub schedule: Schedule,
    pub details: TransactionDetails,
}
