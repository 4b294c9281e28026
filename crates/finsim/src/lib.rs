//! Command-line harness for the finsim ledger simulation
//!
//! Loads household scenarios from YAML, runs them through
//! [`finsim_core`], stores snapshots in a data directory and prints balance
//! reports and what-if comparisons.

pub mod commands;
pub mod logging;
pub mod report;
pub mod scenario;
pub mod storage;

pub use logging::init_logging;
pub use scenario::{AccountKeys, ScenarioData, ScenarioError};
pub use storage::{DataDirectory, StorageError};
