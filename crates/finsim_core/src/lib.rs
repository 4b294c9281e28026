//! Personal-finance sandbox simulation library
//!
//! This crate provides a deterministic, day-stepped ledger simulation:
//! - Recurrence schedules (once, daily, weekly, monthly, yearly) with end dates
//!   and occurrence caps
//! - Simple and two-phase (accrue, then capitalise) interest with pluggable
//!   named calculators
//! - An append-only ledger where every balance is a replay of the log
//! - A household facade for loans, salaries, savings and members
//! - Lossless JSON snapshots used for save, load and fork
//!
//! ```ignore
//! use finsim_core::{Schedule, SimulationHelper, SimulationOptions, NewAccount, Salary};
//!
//! let start = jiff::civil::date(2025, 1, 1);
//! let mut sim = SimulationHelper::new(SimulationOptions::default().starting(start))?;
//! let checking = sim.add_account(NewAccount::new("Checking", "operation"))?;
//! sim.add_salary(Salary {
//!     label: "Pay".into(),
//!     to_account_id: checking.clone(),
//!     amount: 250_000,
//!     schedule: Schedule::weekly(start).every(2),
//! })?;
//! sim.run_until(|_, i| i >= 365)?;
//! println!("{}", sim.account_balance(&checking, None));
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod branch;
pub mod cancel;
pub mod date_math;
pub mod error;
pub mod helper;
pub mod interest;
pub mod ledger;
pub mod schedule;
pub mod simulation;
pub mod snapshot;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use branch::run_branches;
pub use cancel::CancellationToken;
pub use error::{ConfigurationError, InvariantViolation, SimError};
pub use helper::{HelperSnapshot, SimulationHelper};
pub use interest::{CalculatorRegistry, FULL_RATE, FullRate, INTEREST_SOURCE, InterestCalculator};
pub use ledger::Ledger;
pub use model::{
    Account, AccountDetails, AccountId, AccountMeta, AccountSummary, Interest, InterestSchedule,
    Loan, Member, MemberOptions, NewAccount, PayBack, Period, Salary, Saving, Schedule,
    ScheduleEnd, ScheduledTransaction, ScheduledTransactionId, Transaction, TransactionDetails,
    TransactionId,
};
pub use schedule::is_schedule_now;
pub use simulation::{RunOutcome, Simulation, SimulationOptions, TickReport};
pub use snapshot::SimulationSnapshot;
