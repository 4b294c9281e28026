//! YAML scenario files
//!
//! A scenario describes a household in terms of scenario-local account keys:
//!
//! ```yaml
//! startDate: "2025-01-01"
//! accounts:
//!   - key: checking
//!     label: Checking
//!     type: operation
//! salaries:
//!   - label: Pay
//!     to: checking
//!     amount: 250000
//!     schedule: { startAt: "2025-01-25", period: months }
//! ```
//!
//! Applying a scenario creates the accounts first, then resolves every `from`
//! and `to` reference against the keys it just created. A reference that is
//! not a local key is used verbatim as an account id, which covers both
//! accounts already present in a saved simulation (`act-3`) and external
//! counterparties the ledger tracks as unregistered accounts.

use std::fs;
use std::path::Path;

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use finsim_core::{
    AccountId, Interest, Loan, MemberOptions, NewAccount, PayBack, Salary, Saving, Schedule,
    SimError, SimulationHelper, SimulationOptions, TransactionDetails,
};

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse scenario: {0}")]
    Parse(String),
    #[error("account key '{0}' is defined twice")]
    DuplicateKey(String),
    #[error(transparent)]
    Simulation(#[from] SimError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioData {
    /// First simulated day for a fresh simulation; today when absent
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub interest_precision: Option<i64>,
    #[serde(default)]
    pub accounts: Vec<AccountData>,
    #[serde(default)]
    pub members: Vec<MemberData>,
    #[serde(default)]
    pub loans: Vec<LoanData>,
    #[serde(default)]
    pub salaries: Vec<SalaryData>,
    #[serde(default)]
    pub savings: Vec<SavingData>,
    #[serde(default)]
    pub scheduled: Vec<ScheduledData>,
    #[serde(default)]
    pub transactions: Vec<OneOffData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountData {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub interest: Option<Interest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberData {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Account keys owned by the member
    #[serde(default)]
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanData {
    pub label: String,
    pub interest: Interest,
    pub start_amount: i64,
    pub to: String,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub pay_back: Option<PayBack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryData {
    pub label: String,
    pub to: String,
    pub amount: i64,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingData {
    pub label: String,
    pub from: String,
    pub to: String,
    pub amount: i64,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledData {
    pub label: String,
    pub from: String,
    pub to: String,
    pub amount: i64,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneOffData {
    #[serde(default)]
    pub label: String,
    pub from: String,
    pub to: String,
    pub amount: i64,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// Posting date; the simulation's current day when absent
    #[serde(default)]
    pub on: Option<Date>,
}

fn default_kind() -> String {
    "transfer".to_string()
}

/// Scenario-local account keys mapped to the ids the simulation assigned
#[derive(Debug, Clone, Default)]
pub struct AccountKeys {
    ids: FxHashMap<String, AccountId>,
}

impl AccountKeys {
    pub fn get(&self, key: &str) -> Option<&AccountId> {
        self.ids.get(key)
    }

    /// Local key lookup, falling back to the reference itself as an id.
    pub fn resolve(&self, reference: &str) -> AccountId {
        match self.ids.get(reference) {
            Some(id) => id.clone(),
            None => AccountId::from(reference),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl ScenarioData {
    pub fn from_yaml(content: &str) -> Result<Self, ScenarioError> {
        serde_saphyr::from_str(content).map_err(|e| ScenarioError::Parse(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Simulation options for a fresh run of this scenario.
    pub fn options(&self) -> SimulationOptions {
        let mut options = SimulationOptions::default();
        if let Some(precision) = self.interest_precision {
            options = options.with_precision(precision);
        }
        if let Some(start) = self.start_date {
            options = options.starting(start);
        }
        options
    }

    /// Build a fresh simulation seeded with this scenario.
    pub fn build(&self) -> Result<(SimulationHelper, AccountKeys), ScenarioError> {
        let mut sim = SimulationHelper::new(self.options())?;
        let keys = self.apply(&mut sim)?;
        Ok((sim, keys))
    }

    /// Add everything this scenario describes to an existing simulation.
    ///
    /// `startDate` and `interestPrecision` only matter to [`build`](Self::build)
    /// and are ignored here.
    pub fn apply(&self, sim: &mut SimulationHelper) -> Result<AccountKeys, ScenarioError> {
        for (index, account) in self.accounts.iter().enumerate() {
            if self.accounts[..index].iter().any(|a| a.key == account.key) {
                return Err(ScenarioError::DuplicateKey(account.key.clone()));
            }
        }

        let mut keys = AccountKeys::default();
        for account in &self.accounts {
            let mut new_account = NewAccount::new(account.label.clone(), account.kind.clone());
            if let Some(interest) = &account.interest {
                new_account = new_account.with_interest(interest.clone());
            }
            let id = sim.add_account(new_account)?;
            keys.ids.insert(account.key.clone(), id);
        }

        for member in &self.members {
            let options = MemberOptions {
                name: member.name.clone(),
                email: member.email.clone(),
            };
            sim.add_member_with(&member.key, options, |sim: &mut SimulationHelper, key: &str| {
                for account in &member.accounts {
                    sim.link_member_account(key, keys.resolve(account))?;
                }
                Ok(())
            })?;
        }

        for loan in &self.loans {
            sim.add_loan(Loan {
                label: loan.label.clone(),
                interest: loan.interest.clone(),
                start_amount: loan.start_amount,
                to_account_id: keys.resolve(&loan.to),
                start_date: loan.start_date,
                pay_back: loan.pay_back.clone(),
            })?;
        }

        for salary in &self.salaries {
            sim.add_salary(Salary {
                label: salary.label.clone(),
                to_account_id: keys.resolve(&salary.to),
                amount: salary.amount,
                schedule: salary.schedule.clone(),
            })?;
        }

        for saving in &self.savings {
            sim.add_savings(Saving {
                label: saving.label.clone(),
                from_account_id: keys.resolve(&saving.from),
                to_account_id: keys.resolve(&saving.to),
                amount: saving.amount,
                schedule: saving.schedule.clone(),
            })?;
        }

        for scheduled in &self.scheduled {
            let details = TransactionDetails::new(
                keys.resolve(&scheduled.from),
                keys.resolve(&scheduled.to),
                scheduled.amount,
                scheduled.kind.clone(),
            )
            .labelled(scheduled.label.clone());
            sim.add_scheduled_transaction(scheduled.schedule.clone(), details)?;
        }

        for one_off in &self.transactions {
            let details = TransactionDetails::new(
                keys.resolve(&one_off.from),
                keys.resolve(&one_off.to),
                one_off.amount,
                one_off.kind.clone(),
            )
            .labelled(one_off.label.clone());
            sim.add_transaction(details, one_off.on)?;
        }

        tracing::info!(
            accounts = keys.len(),
            loans = self.loans.len(),
            salaries = self.salaries.len(),
            savings = self.savings.len(),
            scheduled = self.scheduled.len(),
            "applied scenario"
        );
        Ok(keys)
    }
}
