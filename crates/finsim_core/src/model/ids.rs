//! Identifiers for ledger entities
//!
//! Ids are plain strings on the wire so that snapshots stay readable and so
//! that callers can reference synthetic accounts (interest sources, salary
//! payers) that were never registered.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of an account, registered or not
    AccountId
);
string_id!(
    /// Identifier of a posted transaction
    TransactionId
);
string_id!(
    /// Identifier of a scheduled transaction template
    ScheduledTransactionId
);

impl AccountId {
    /// The per-account holding account used by two-phase interest.
    pub fn pending_interest(&self) -> AccountId {
        AccountId(format!("{}-pending-interest", self.0))
    }
}
