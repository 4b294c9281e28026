use serde::{Deserialize, Serialize};

use super::ids::AccountId;
use super::interest::Interest;
use super::transaction::Transaction;

/// Type tag reported for ids that were never registered
pub const UNREGISTERED: &str = "un-registered";

/// A registered account. Label and type never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub label: String,
    /// Free-form tag ("operation", "loan", "saving", ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub interest: Option<Interest>,
}

/// Input for registering an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub interest: Option<Interest>,
}

impl NewAccount {
    pub fn new(label: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: kind.into(),
            interest: None,
        }
    }

    #[must_use]
    pub fn with_interest(mut self, interest: Interest) -> Self {
        self.interest = Some(interest);
        self
    }
}

/// Descriptive view of an account id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountMeta {
    pub interest: Option<Interest>,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl AccountMeta {
    pub fn unregistered(id: &AccountId) -> Self {
        Self {
            interest: None,
            label: format!("**{id}"),
            kind: UNREGISTERED.to_string(),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.kind != UNREGISTERED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    #[serde(flatten)]
    pub account: Account,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDetails {
    pub balance: i64,
    pub transactions: Vec<Transaction>,
}
