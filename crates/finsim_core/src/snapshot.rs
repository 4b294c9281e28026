//! Portable engine state
//!
//! A [`SimulationSnapshot`] holds everything needed to rebuild a simulation
//! except its interest calculators, which are code. Dates are typed fields
//! encoded as ISO `YYYY-MM-DD` strings and money stays integral, so a
//! snapshot survives any number of JSON round trips unchanged.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::interest::CalculatorRegistry;
use crate::ledger::Ledger;
use crate::model::{Account, ScheduledTransaction, Transaction};
use crate::simulation::Simulation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSnapshot {
    pub started_on: Date,
    pub tick: u64,
    pub interest_rate_precision: i64,
    pub current_date: Date,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub scheduled_transactions: Vec<ScheduledTransaction>,
}

impl Simulation {
    pub fn to_snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            started_on: self.started_on,
            tick: self.tick_count,
            interest_rate_precision: self.interest_precision,
            current_date: self.current_date,
            accounts: self.ledger.accounts().to_vec(),
            transactions: self.ledger.transactions().to_vec(),
            scheduled_transactions: self.scheduled.clone(),
        }
    }

    /// Rebuild a simulation with only the built-in calculators registered.
    pub fn from_snapshot(snapshot: SimulationSnapshot) -> Result<Self> {
        if snapshot.interest_rate_precision <= 0 {
            return Err(
                ConfigurationError::InvalidPrecision(snapshot.interest_rate_precision).into(),
            );
        }
        Ok(Self::restore(snapshot, CalculatorRegistry::default()))
    }

    fn restore(snapshot: SimulationSnapshot, calculators: CalculatorRegistry) -> Self {
        Self {
            ledger: Ledger::from_parts(snapshot.accounts, snapshot.transactions),
            scheduled: snapshot.scheduled_transactions,
            calculators,
            started_on: snapshot.started_on,
            current_date: snapshot.current_date,
            tick_count: snapshot.tick,
            interest_precision: snapshot.interest_rate_precision,
        }
    }

    pub fn to_portable(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_snapshot())?)
    }

    pub fn from_portable(json: &str) -> Result<Self> {
        tracing::debug!(bytes = json.len(), "reviving simulation from snapshot");
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Deep copy of the current state that shares nothing mutable with
    /// `self`. Registered calculators carry over.
    pub fn fork(&self) -> Self {
        tracing::debug!(tick = self.tick_count, date = %self.current_date, "forking simulation");
        Self::restore(self.to_snapshot(), self.calculators.clone())
    }
}
