//! Engine-level tests for the finsim simulation
//!
//! Tests are organized by topic:
//! - `engine` - Tick mechanics, run drivers and cancellation
//! - `interest` - Interest accrual driven through the tick loop
//! - `helper` - Loans, salaries, savings and members
//! - `snapshot` - Portable state, restore and fork

mod interest;

use jiff::civil::{Date, date};

use crate::simulation::{Simulation, SimulationOptions};

pub(crate) const START: Date = date(2022, 1, 1);

pub(crate) fn simulation_at(start: Date) -> Simulation {
    Simulation::new(SimulationOptions::default().starting(start)).unwrap()
}
