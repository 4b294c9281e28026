//! Subcommand implementations
//!
//! Each command returns the text to print so the binary stays a thin shell
//! around argument parsing.

use std::path::Path;

use color_eyre::eyre::WrapErr;
use finsim_core::{AccountId, SimulationHelper, run_branches};

use crate::report::{account_statement, balance_table, comparison_table};
use crate::scenario::ScenarioData;
use crate::storage::DataDirectory;

/// Tick `sim` forward by `days` calendar days.
fn advance(sim: &mut SimulationHelper, days: u64) -> color_eyre::Result<()> {
    if days == 0 {
        return Ok(());
    }
    sim.run_until(|_, i| i >= days)
        .wrap_err_with(|| format!("simulation failed after {} ticks", sim.tick_count()))?;
    Ok(())
}

fn save_if_requested(
    data_dir: &DataDirectory,
    sim: &SimulationHelper,
    save: Option<&str>,
    out: &mut String,
) -> color_eyre::Result<()> {
    if let Some(name) = save {
        let path = data_dir.save_snapshot(name, sim)?;
        out.push_str(&format!("Saved snapshot '{}' to {}\n", name, path.display()));
    }
    Ok(())
}

/// Build a fresh simulation from a scenario file and run it.
pub fn run(
    data_dir: &DataDirectory,
    scenario: &Path,
    days: u64,
    save: Option<&str>,
) -> color_eyre::Result<String> {
    let data = ScenarioData::from_path(scenario)?;
    let (mut sim, _) = data
        .build()
        .wrap_err_with(|| format!("invalid scenario {}", scenario.display()))?;
    tracing::info!(scenario = %scenario.display(), days, "running scenario");

    advance(&mut sim, days)?;

    let mut out = balance_table(&sim);
    save_if_requested(data_dir, &sim, save, &mut out)?;
    Ok(out)
}

/// Continue a saved simulation.
pub fn resume(
    data_dir: &DataDirectory,
    name: &str,
    days: u64,
    save: Option<&str>,
) -> color_eyre::Result<String> {
    let mut sim = data_dir.load_snapshot(name)?;
    tracing::info!(name, days, "resuming simulation");

    advance(&mut sim, days)?;

    let mut out = balance_table(&sim);
    save_if_requested(data_dir, &sim, save, &mut out)?;
    Ok(out)
}

/// Show a saved simulation, or one account's statement.
pub fn report(
    data_dir: &DataDirectory,
    name: &str,
    account: Option<&str>,
) -> color_eyre::Result<String> {
    let sim = data_dir.load_snapshot(name)?;
    Ok(match account {
        Some(id) => account_statement(&sim, &AccountId::from(id)),
        None => balance_table(&sim),
    })
}

/// Fork a saved simulation, add a scenario to the fork and run both side by
/// side. Neither branch is saved.
pub fn what_if(
    data_dir: &DataDirectory,
    name: &str,
    scenario: &Path,
    days: u64,
) -> color_eyre::Result<String> {
    let baseline = data_dir.load_snapshot(name)?;
    let mut variant = baseline.fork();
    ScenarioData::from_path(scenario)?
        .apply(&mut variant)
        .wrap_err_with(|| format!("cannot apply {} to '{}'", scenario.display(), name))?;

    let mut branches = [baseline, variant];
    if days > 0 {
        let ticks = run_branches(&mut branches, |_, i| i >= days)?;
        tracing::info!(name, ?ticks, "what-if branches finished");
    }

    let [baseline, variant] = &branches;
    Ok(comparison_table(baseline, variant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SCENARIO: &str = r#"
startDate: "2025-01-01"
accounts:
  - key: checking
    label: Checking
    type: operation
  - key: savings
    label: Savings
    type: saving
salaries:
  - label: Pay
    to: checking
    amount: 300000
    schedule:
      startAt: "2025-01-25"
      period: months
"#;

    const RAISE: &str = r#"
salaries:
  - label: Side gig
    to: act-1
    amount: 50000
    schedule:
      startAt: "2025-02-10"
      period: months
"#;

    fn setup() -> (TempDir, DataDirectory) {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = DataDirectory::new(temp_dir.path().join("data"));
        fs::write(temp_dir.path().join("household.yaml"), SCENARIO).unwrap();
        fs::write(temp_dir.path().join("raise.yaml"), RAISE).unwrap();
        (temp_dir, data_dir)
    }

    #[test]
    fn test_run_saves_snapshot() {
        let (temp_dir, data_dir) = setup();

        let out = run(
            &data_dir,
            &temp_dir.path().join("household.yaml"),
            31,
            Some("baseline"),
        )
        .unwrap();

        assert!(out.starts_with("As of 2025-02-01 (day 31, tick 31)"));
        assert!(out.contains("$3,000.00"));
        assert!(out.contains("Saved snapshot 'baseline'"));
        let saved = data_dir.load_snapshot("baseline").unwrap();
        assert_eq!(saved.tick_count(), 31);
    }

    #[test]
    fn test_resume_continues_from_snapshot() {
        let (temp_dir, data_dir) = setup();
        run(&data_dir, &temp_dir.path().join("household.yaml"), 31, Some("baseline")).unwrap();

        let out = resume(&data_dir, "baseline", 28, Some("march")).unwrap();

        assert!(out.starts_with("As of 2025-03-01 (day 59, tick 59)"));
        assert!(out.contains("$6,000.00"));
        // The source snapshot is untouched
        assert_eq!(data_dir.load_snapshot("baseline").unwrap().tick_count(), 31);
        assert_eq!(data_dir.load_snapshot("march").unwrap().tick_count(), 59);
    }

    #[test]
    fn test_report_account_statement() {
        let (temp_dir, data_dir) = setup();
        run(&data_dir, &temp_dir.path().join("household.yaml"), 31, Some("baseline")).unwrap();

        let out = report(&data_dir, "baseline", Some("act-1")).unwrap();

        assert!(out.starts_with("Checking (act-1, operation)"));
        assert!(out.contains("2025-01-25"));
        assert!(out.ends_with("Balance: $3,000.00\n"));
    }

    #[test]
    fn test_what_if_compares_branches() {
        let (temp_dir, data_dir) = setup();
        run(&data_dir, &temp_dir.path().join("household.yaml"), 31, Some("baseline")).unwrap();

        let out = what_if(&data_dir, "baseline", &temp_dir.path().join("raise.yaml"), 28).unwrap();

        let checking = out.lines().find(|line| line.starts_with("act-1")).unwrap();
        assert!(checking.contains("$6,000.00"));
        assert!(checking.contains("$6,500.00"));
        assert!(checking.contains("$500.00"));
        // What-if never writes back
        assert_eq!(data_dir.load_snapshot("baseline").unwrap().tick_count(), 31);
    }

    #[test]
    fn test_missing_snapshot_is_an_error() {
        let (_temp_dir, data_dir) = setup();

        let err = report(&data_dir, "nope", None).unwrap_err();

        assert!(err.to_string().contains("no snapshot named 'nope'"));
    }
}
