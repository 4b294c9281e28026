//! Day-tick simulation engine
//!
//! A [`Simulation`] owns its ledger, its scheduled transactions and its
//! interest calculators. Time only moves through [`Simulation::tick`], one
//! calendar day at a time. On each tick the engine:
//!
//! 1. advances the current date by one day
//! 2. posts every scheduled transaction whose schedule fires that day
//! 3. runs the interest model for every interest-bearing account
//! 4. bumps the tick counter
//!
//! Every posting of a tick, interest amounts included, is worked out before
//! anything is written, so a tick that fails leaves the state untouched.

use std::future::Future;

use jiff::civil::Date;

use crate::cancel::CancellationToken;
use crate::date_math::{add_days, days_between};
use crate::error::{ConfigurationError, InvariantViolation, Result};
use crate::interest::{CalculatorRegistry, InterestCalculator, accrual_postings, plan_accrual};
use crate::ledger::Ledger;
use crate::model::{
    Account, AccountDetails, AccountId, AccountMeta, AccountSummary, Interest, NewAccount,
    Schedule, ScheduledTransaction, ScheduledTransactionId, Transaction, TransactionDetails,
    TransactionId,
};
use crate::schedule::is_schedule_now;

/// Interest rates are percent * 1000 unless configured otherwise
pub const DEFAULT_INTEREST_PRECISION: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationOptions {
    pub interest_precision: i64,
    /// First simulated day; defaults to today in the system time zone
    pub start_date: Option<Date>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            interest_precision: DEFAULT_INTEREST_PRECISION,
            start_date: None,
        }
    }
}

impl SimulationOptions {
    #[must_use]
    pub fn starting(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: i64) -> Self {
        self.interest_precision = precision;
        self
    }
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub date: Date,
    pub tick: u64,
    pub posted: Vec<TransactionId>,
}

/// How a cancellable run ended, with the number of ticks it completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Stopped(u64),
    Cancelled(u64),
}

impl RunOutcome {
    pub fn iterations(&self) -> u64 {
        match self {
            RunOutcome::Stopped(n) | RunOutcome::Cancelled(n) => *n,
        }
    }
}

#[derive(Debug)]
pub struct Simulation {
    pub(crate) ledger: Ledger,
    pub(crate) scheduled: Vec<ScheduledTransaction>,
    pub(crate) calculators: CalculatorRegistry,
    pub(crate) started_on: Date,
    pub(crate) current_date: Date,
    pub(crate) tick_count: u64,
    pub(crate) interest_precision: i64,
}

impl AsMut<Simulation> for Simulation {
    fn as_mut(&mut self) -> &mut Simulation {
        self
    }
}

impl Simulation {
    pub fn new(options: SimulationOptions) -> Result<Self> {
        if options.interest_precision <= 0 {
            return Err(ConfigurationError::InvalidPrecision(options.interest_precision).into());
        }
        let started_on = options
            .start_date
            .unwrap_or_else(|| jiff::Zoned::now().date());

        Ok(Self {
            ledger: Ledger::new(),
            scheduled: Vec::new(),
            calculators: CalculatorRegistry::default(),
            started_on,
            current_date: started_on,
            tick_count: 0,
            interest_precision: options.interest_precision,
        })
    }

    // ------------------------------------------------------------------
    // Readers
    // ------------------------------------------------------------------

    pub fn current_date(&self) -> Date {
        self.current_date
    }

    pub fn started_on(&self) -> Date {
        self.started_on
    }

    /// Days elapsed since the simulation started
    pub fn simulation_age(&self) -> i32 {
        days_between(self.started_on, self.current_date)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn interest_precision(&self) -> i64 {
        self.interest_precision
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn accounts(&self) -> &[Account] {
        self.ledger.accounts()
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    pub fn scheduled_transactions(&self) -> &[ScheduledTransaction] {
        &self.scheduled
    }

    pub fn calculators(&self) -> &CalculatorRegistry {
        &self.calculators
    }

    pub fn account_balance(&self, id: &AccountId, until: Option<Date>) -> i64 {
        self.ledger.balance(id, until)
    }

    pub fn account_details(&self, id: &AccountId, until: Option<Date>) -> AccountDetails {
        self.ledger.details(id, until)
    }

    pub fn account_summaries(&self, until: Option<Date>) -> Vec<AccountSummary> {
        self.ledger.summaries(until)
    }

    pub fn account_meta(&self, id: &AccountId) -> AccountMeta {
        self.ledger.meta(id)
    }

    pub fn account_debits(&self, id: &AccountId, until: Option<Date>) -> Vec<Transaction> {
        self.ledger.debits(id, until)
    }

    pub fn account_credits(&self, id: &AccountId, until: Option<Date>) -> Vec<Transaction> {
        self.ledger.credits(id, until)
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Register (or replace) a named interest calculator.
    pub fn define_interest_calculator(
        &mut self,
        name: impl Into<String>,
        calculator: impl InterestCalculator + 'static,
    ) {
        self.calculators.define(name, calculator);
    }

    pub fn add_account(&mut self, account: NewAccount) -> Result<AccountId> {
        validate_account(&account)?;
        Ok(self.ledger.add_account(account))
    }

    /// Post a one-off transaction, dated today unless `occured_on` is given.
    pub fn add_transaction(
        &mut self,
        details: TransactionDetails,
        occured_on: Option<Date>,
    ) -> Result<TransactionId> {
        details.validate("transaction")?;
        let occured_on = occured_on.unwrap_or(self.current_date);
        Ok(self.ledger.add_transaction(details, occured_on))
    }

    pub fn add_scheduled_transaction(
        &mut self,
        schedule: Schedule,
        details: TransactionDetails,
    ) -> Result<ScheduledTransactionId> {
        details.validate_labelled("scheduled transaction")?;
        schedule.interval()?;
        Ok(self.push_scheduled(schedule, details))
    }

    /// Append a scheduled transaction the caller already validated.
    pub(crate) fn push_scheduled(
        &mut self,
        schedule: Schedule,
        details: TransactionDetails,
    ) -> ScheduledTransactionId {
        let id = ScheduledTransactionId(format!("sx-{}", self.scheduled.len() + 1));
        tracing::debug!(
            scheduled_transaction_id = %id,
            period = ?schedule.period,
            start_at = %schedule.start_at,
            label = %details.label,
            "adding scheduled transaction"
        );
        self.scheduled.push(ScheduledTransaction {
            id: id.clone(),
            created_on: self.current_date,
            schedule,
            details,
        });
        id
    }

    // ------------------------------------------------------------------
    // Drivers
    // ------------------------------------------------------------------

    /// Advance the simulation by one calendar day.
    pub fn tick(&mut self) -> Result<TickReport> {
        let date = add_days(self.current_date, 1);
        let tick = self.tick_count + 1;
        let _span = tracing::debug_span!("tick", tick, %date).entered();

        let mut postings = Vec::new();
        for scheduled in &self.scheduled {
            if is_schedule_now(&scheduled.schedule, date)? {
                postings.push(scheduled.details.clone());
            } else {
                tracing::trace!(scheduled_transaction_id = %scheduled.id, "not due");
            }
        }

        for account in self.ledger.accounts() {
            let Some(interest) = &account.interest else {
                continue;
            };
            let plan = plan_accrual(interest, &self.calculators, date)?;
            if plan.is_idle() {
                continue;
            }
            // Balances as they will stand once this tick's earlier postings land
            let balance = |id: &AccountId| {
                self.ledger.balance(id, None)
                    + postings
                        .iter()
                        .map(|details| details.signed_amount_for(id))
                        .sum::<i64>()
            };
            let accrued = accrual_postings(
                balance,
                &self.calculators,
                account,
                interest,
                plan,
                self.interest_precision,
                date,
            )?;
            postings.extend(accrued);
        }

        let posted: Vec<TransactionId> = postings
            .into_iter()
            .map(|details| self.ledger.add_transaction(details, date))
            .collect();

        self.current_date = date;
        self.tick_count = tick;
        tracing::debug!(posted = posted.len(), "tick complete");

        Ok(TickReport { date, tick, posted })
    }

    /// Tick until `predicate` returns true.
    ///
    /// The predicate sees the state after each tick together with the 1-based
    /// iteration number; the returned count is the number of ticks run. There
    /// is no built-in iteration cap.
    pub fn run_until<P>(&mut self, mut predicate: P) -> Result<u64>
    where
        P: FnMut(&Simulation, u64) -> bool,
    {
        let mut iteration = 0;
        loop {
            iteration += 1;
            self.tick()?;
            if predicate(self, iteration) {
                break;
            }
        }
        tracing::info!(iteration, date = %self.current_date, "run stopped");
        Ok(iteration)
    }

    /// [`run_until`](Self::run_until) with an asynchronous predicate.
    ///
    /// Awaiting the predicate is the only suspension point, which lets a
    /// caller yield to its event loop between ticks. Ticks never overlap.
    /// The predicate's future cannot borrow the simulation; read what it
    /// needs before building the future.
    pub async fn async_run_until<P, F>(&mut self, mut predicate: P) -> Result<u64>
    where
        P: FnMut(&Simulation, u64) -> F,
        F: Future<Output = bool>,
    {
        let mut iteration = 0;
        loop {
            iteration += 1;
            self.tick()?;
            if predicate(self, iteration).await {
                break;
            }
        }
        tracing::info!(iteration, date = %self.current_date, "async run stopped");
        Ok(iteration)
    }

    /// [`run_until`](Self::run_until) that also stops, before the next tick,
    /// once `token` is cancelled.
    pub fn run_until_cancellable<P>(
        &mut self,
        mut predicate: P,
        token: &CancellationToken,
    ) -> Result<RunOutcome>
    where
        P: FnMut(&Simulation, u64) -> bool,
    {
        let mut iteration = 0;
        loop {
            if token.is_cancelled() {
                tracing::info!(iteration, date = %self.current_date, "run cancelled");
                return Ok(RunOutcome::Cancelled(iteration));
            }
            iteration += 1;
            self.tick()?;
            if predicate(self, iteration) {
                tracing::info!(iteration, date = %self.current_date, "run stopped");
                return Ok(RunOutcome::Stopped(iteration));
            }
        }
    }
}

fn validate_account(account: &NewAccount) -> Result<()> {
    if account.label.trim().is_empty() {
        return Err(InvariantViolation::MissingField {
            entity: "account",
            field: "label",
        }
        .into());
    }
    if let Some(interest) = &account.interest {
        validate_interest(interest)?;
    }
    Ok(())
}

pub(crate) fn validate_interest(interest: &Interest) -> Result<(), ConfigurationError> {
    for schedule in interest.schedules() {
        schedule.interval()?;
    }
    Ok(())
}
