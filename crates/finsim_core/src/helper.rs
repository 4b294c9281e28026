//! Household facade over the engine
//!
//! [`SimulationHelper`] wraps a [`Simulation`] and expands loans, salaries,
//! savings plans and members into plain accounts and (scheduled)
//! transactions. It dereferences to the wrapped simulation, so the engine's
//! readers, mutators and drivers are available on the helper as well.

use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{InvariantViolation, Result};
use crate::model::{
    AccountId, Loan, LoanRecord, LoanSeed, Member, MemberOptions, NewAccount, Salary,
    SalaryRecord, Saving, SavingRecord, Schedule, ScheduledTransactionId, TransactionDetails,
};
use crate::simulation::{Simulation, SimulationOptions, validate_interest};
use crate::snapshot::SimulationSnapshot;

/// Synthetic account salaries are paid from
pub const SALARY_SOURCE: &str = "salary-source";

pub const LOAN: &str = "loan";
pub const PAY_BACK: &str = "pay-back";
pub const SALARY: &str = "salary";
pub const SAVING: &str = "saving";

#[derive(Debug)]
pub struct SimulationHelper {
    simulation: Simulation,
    loans: Vec<LoanRecord>,
    salaries: Vec<SalaryRecord>,
    savings: Vec<SavingRecord>,
    members: Vec<Member>,
    member_index: FxHashMap<String, usize>,
}

/// Engine snapshot plus the helper's own records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperSnapshot {
    #[serde(flatten)]
    pub simulation: SimulationSnapshot,
    #[serde(default)]
    pub loans: Vec<LoanRecord>,
    #[serde(default)]
    pub salaries: Vec<SalaryRecord>,
    #[serde(default)]
    pub savings: Vec<SavingRecord>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Deref for SimulationHelper {
    type Target = Simulation;

    fn deref(&self) -> &Simulation {
        &self.simulation
    }
}

impl DerefMut for SimulationHelper {
    fn deref_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }
}

impl AsMut<Simulation> for SimulationHelper {
    fn as_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }
}

impl From<Simulation> for SimulationHelper {
    fn from(simulation: Simulation) -> Self {
        Self {
            simulation,
            loans: Vec::new(),
            salaries: Vec::new(),
            savings: Vec::new(),
            members: Vec::new(),
            member_index: FxHashMap::default(),
        }
    }
}

impl SimulationHelper {
    pub fn new(options: SimulationOptions) -> Result<Self> {
        Ok(Simulation::new(options)?.into())
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn into_simulation(self) -> Simulation {
        self.simulation
    }

    pub fn loans(&self) -> &[LoanRecord] {
        &self.loans
    }

    pub fn salaries(&self) -> &[SalaryRecord] {
        &self.salaries
    }

    pub fn savings(&self) -> &[SavingRecord] {
        &self.savings
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, key: &str) -> Option<Member> {
        self.member_index
            .get(key)
            .map(|&index| self.members[index].clone())
    }

    /// Create an interest-bearing loan account and move its principal.
    ///
    /// The principal is posted right away when `start_date` is absent or not
    /// in the future (dated `start_date` if given), otherwise it is scheduled
    /// once for `start_date`. Returns the loan account id.
    pub fn add_loan(&mut self, loan: Loan) -> Result<AccountId> {
        require_label("loan", &loan.label)?;
        require_account("loan", "toAccountId", &loan.to_account_id)?;
        require_non_negative("loan", loan.start_amount)?;
        validate_interest(&loan.interest)?;
        if let Some(pay_back) = &loan.pay_back {
            require_non_negative("loan pay-back", pay_back.amount)?;
            pay_back.schedule.interval()?;
        }

        let loan_account_id = self.simulation.ledger.add_account(
            NewAccount::new(loan.label.clone(), LOAN).with_interest(loan.interest.clone()),
        );
        let principal = TransactionDetails::new(
            loan_account_id.clone(),
            loan.to_account_id.clone(),
            loan.start_amount,
            LOAN,
        )
        .labelled(loan.label.clone());

        let today = self.simulation.current_date();
        let seed = match loan.start_date {
            Some(start) if start > today => LoanSeed::Scheduled(
                self.simulation
                    .push_scheduled(Schedule::once(start), principal),
            ),
            start => LoanSeed::Posted(
                self.simulation
                    .ledger
                    .add_transaction(principal, start.unwrap_or(today)),
            ),
        };

        let pay_back_id = loan.pay_back.as_ref().map(|pay_back| {
            let details = TransactionDetails::new(
                loan.to_account_id.clone(),
                loan_account_id.clone(),
                pay_back.amount,
                PAY_BACK,
            )
            .labelled(format!("{} pay-back", loan.label));
            self.simulation
                .push_scheduled(pay_back.schedule.clone(), details)
        });

        tracing::debug!(loan_account_id = %loan_account_id, label = %loan.label, "added loan");
        self.loans.push(LoanRecord {
            loan,
            loan_account_id: loan_account_id.clone(),
            seed,
            pay_back_id,
        });
        Ok(loan_account_id)
    }

    pub fn add_salary(&mut self, salary: Salary) -> Result<ScheduledTransactionId> {
        let details = TransactionDetails::new(
            SALARY_SOURCE,
            salary.to_account_id.clone(),
            salary.amount,
            SALARY,
        )
        .labelled(salary.label.clone());
        let scheduled_transaction_id = self
            .simulation
            .add_scheduled_transaction(salary.schedule.clone(), details)?;

        self.salaries.push(SalaryRecord {
            salary,
            scheduled_transaction_id: scheduled_transaction_id.clone(),
        });
        Ok(scheduled_transaction_id)
    }

    pub fn add_savings(&mut self, saving: Saving) -> Result<ScheduledTransactionId> {
        let details = TransactionDetails::new(
            saving.from_account_id.clone(),
            saving.to_account_id.clone(),
            saving.amount,
            SAVING,
        )
        .labelled(saving.label.clone());
        let scheduled_transaction_id = self
            .simulation
            .add_scheduled_transaction(saving.schedule.clone(), details)?;

        self.savings.push(SavingRecord {
            saving,
            scheduled_transaction_id: scheduled_transaction_id.clone(),
        });
        Ok(scheduled_transaction_id)
    }

    /// Get or create the member stored under `key`.
    pub fn add_member(&mut self, key: &str, options: MemberOptions) -> Result<Member> {
        self.add_member_with(key, options, |_, _| Ok(()))
    }

    /// Get or create the member stored under `key`, running `init` only when
    /// the member is created. `init` typically opens and links the member's
    /// accounts.
    pub fn add_member_with<F>(
        &mut self,
        key: &str,
        options: MemberOptions,
        init: F,
    ) -> Result<Member>
    where
        F: FnOnce(&mut SimulationHelper, &str) -> Result<()>,
    {
        if let Some(existing) = self.member(key) {
            return Ok(existing);
        }
        if key.trim().is_empty() {
            return Err(InvariantViolation::MissingField {
                entity: "member",
                field: "key",
            }
            .into());
        }
        require_label("member", &options.name).map_err(|_| InvariantViolation::MissingField {
            entity: "member",
            field: "name",
        })?;

        tracing::debug!(key, name = %options.name, "adding member");
        self.member_index.insert(key.to_string(), self.members.len());
        self.members.push(Member {
            key: key.to_string(),
            name: options.name,
            email: options.email,
            account_ids: Vec::new(),
        });

        init(self, key)?;

        self.member(key)
            .ok_or_else(|| InvariantViolation::UnknownMember(key.to_string()).into())
    }

    /// Attach an account to a member; linking twice is a no-op.
    pub fn link_member_account(&mut self, key: &str, account_id: AccountId) -> Result<()> {
        let index = *self
            .member_index
            .get(key)
            .ok_or_else(|| InvariantViolation::UnknownMember(key.to_string()))?;
        let member = &mut self.members[index];
        if !member.account_ids.contains(&account_id) {
            member.account_ids.push(account_id);
        }
        Ok(())
    }

    pub fn to_snapshot(&self) -> HelperSnapshot {
        HelperSnapshot {
            simulation: self.simulation.to_snapshot(),
            loans: self.loans.clone(),
            salaries: self.salaries.clone(),
            savings: self.savings.clone(),
            members: self.members.clone(),
        }
    }

    pub fn from_snapshot(snapshot: HelperSnapshot) -> Result<Self> {
        let simulation = Simulation::from_snapshot(snapshot.simulation)?;
        Ok(Self::with_records(
            simulation,
            snapshot.loans,
            snapshot.salaries,
            snapshot.savings,
            snapshot.members,
        ))
    }

    fn with_records(
        simulation: Simulation,
        loans: Vec<LoanRecord>,
        salaries: Vec<SalaryRecord>,
        savings: Vec<SavingRecord>,
        members: Vec<Member>,
    ) -> Self {
        let member_index = members
            .iter()
            .enumerate()
            .map(|(index, member)| (member.key.clone(), index))
            .collect();
        Self {
            simulation,
            loans,
            salaries,
            savings,
            members,
            member_index,
        }
    }

    pub fn to_portable(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_snapshot())?)
    }

    /// Accepts both helper snapshots and bare engine snapshots.
    pub fn from_portable(json: &str) -> Result<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Independent copy of the engine state and the helper's records.
    pub fn fork(&self) -> Self {
        Self::with_records(
            self.simulation.fork(),
            self.loans.clone(),
            self.salaries.clone(),
            self.savings.clone(),
            self.members.clone(),
        )
    }
}

fn require_label(entity: &'static str, label: &str) -> Result<(), InvariantViolation> {
    if label.trim().is_empty() {
        return Err(InvariantViolation::MissingField {
            entity,
            field: "label",
        });
    }
    Ok(())
}

fn require_account(
    entity: &'static str,
    field: &'static str,
    id: &AccountId,
) -> Result<(), InvariantViolation> {
    if id.is_empty() {
        return Err(InvariantViolation::MissingField { entity, field });
    }
    Ok(())
}

fn require_non_negative(entity: &'static str, amount: i64) -> Result<(), InvariantViolation> {
    if amount < 0 {
        return Err(InvariantViolation::NegativeAmount { entity, amount });
    }
    Ok(())
}
