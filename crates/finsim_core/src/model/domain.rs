//! Household-level building blocks composed by the simulation helper
//!
//! None of these types take part in balance math directly; each one expands
//! into accounts and (scheduled) transactions on the engine.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::ids::{AccountId, ScheduledTransactionId, TransactionId};
use super::interest::Interest;
use super::schedule::Schedule;

/// Recurring repayment from the receiving account back into the loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBack {
    pub amount: i64,
    pub schedule: Schedule,
}

/// Money provided to an account out of an interest-bearing loan account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub label: String,
    pub interest: Interest,
    pub start_amount: i64,
    pub to_account_id: AccountId,
    /// Day the principal moves; absent means the simulation's current day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_back: Option<PayBack>,
}

/// How a loan's principal was seeded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoanSeed {
    Posted(TransactionId),
    Scheduled(ScheduledTransactionId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    #[serde(flatten)]
    pub loan: Loan,
    pub loan_account_id: AccountId,
    pub seed: LoanSeed,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_back_id: Option<ScheduledTransactionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub label: String,
    pub to_account_id: AccountId,
    pub amount: i64,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    #[serde(flatten)]
    pub salary: Salary,
    pub scheduled_transaction_id: ScheduledTransactionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Saving {
    pub label: String,
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: i64,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingRecord {
    #[serde(flatten)]
    pub saving: Saving,
    pub scheduled_transaction_id: ScheduledTransactionId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberOptions {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A person grouping accounts under a readable name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub account_ids: Vec<AccountId>,
}
