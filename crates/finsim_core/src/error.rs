use thiserror::Error;

/// Bad configuration detected while evaluating schedules or interest rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("interest calculator {0:?} is not registered")]
    UnknownInterestCalculator(String),
    #[error("schedule interval must be a positive integer, got {0}")]
    InvalidInterval(u32),
    #[error("unknown schedule period {0:?}")]
    UnknownPeriod(String),
    #[error("interest precision must be positive, got {0}")]
    InvalidPrecision(i64),
}

/// A mutator was called with data that would break a ledger invariant.
///
/// Always raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{entity} is missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("{entity} amount must be non-negative, got {amount}")]
    NegativeAmount { entity: &'static str, amount: i64 },
    #[error("member {0:?} does not exist")]
    UnknownMember(String),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error("snapshot could not be encoded or decoded: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("amount {0} does not fit in 64-bit minor units")]
    AmountOverflow(i128),
}

pub type Result<T, E = SimError> = std::result::Result<T, E>;
