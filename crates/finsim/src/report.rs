//! Plain-text reports over a simulation's ledger

use std::fmt::Write;

use finsim_core::{AccountId, Simulation};

/// Format minor units (cents) as a currency value
pub fn format_currency(minor_units: i64) -> String {
    let abs_value = minor_units.unsigned_abs();
    let dollars = abs_value / 100;
    let cents = abs_value % 100;

    // Add thousands separators
    let dollars_str = dollars.to_string();
    let mut result = String::new();
    for (i, c) in dollars_str.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let dollars_formatted: String = result.chars().rev().collect();

    if minor_units >= 0 {
        format!("${}.{:02}", dollars_formatted, cents)
    } else {
        format!("-${}.{:02}", dollars_formatted, cents)
    }
}

/// Balance of every registered account on the simulation's current date
pub fn balance_table(sim: &Simulation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "As of {} (day {}, tick {})",
        sim.current_date(),
        sim.simulation_age(),
        sim.tick_count()
    );
    let _ = writeln!(out, "{:<8} {:<24} {:<12} {:>16}", "ID", "ACCOUNT", "TYPE", "BALANCE");
    for summary in sim.account_summaries(None) {
        let _ = writeln!(
            out,
            "{:<8} {:<24} {:<12} {:>16}",
            summary.account.id,
            summary.account.label,
            summary.account.kind,
            format_currency(summary.balance)
        );
    }
    out
}

/// Transactions touching one account, oldest first, with a running balance
pub fn account_statement(sim: &Simulation, id: &AccountId) -> String {
    let meta = sim.account_meta(id);
    let details = sim.account_details(id, None);

    let mut out = String::new();
    let _ = writeln!(out, "{} ({}, {})", meta.label, id, meta.kind);
    let mut running = 0;
    for tx in &details.transactions {
        let amount = tx.details.signed_amount_for(id);
        running += amount;
        let _ = writeln!(
            out,
            "{}  {:<28} {:>14} {:>16}",
            tx.occured_on,
            tx.details.label,
            format_currency(amount),
            format_currency(running)
        );
    }
    let _ = writeln!(out, "Balance: {}", format_currency(details.balance));
    out
}

/// Side-by-side balances of a baseline and a variant that forked from it
pub fn comparison_table(baseline: &Simulation, variant: &Simulation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<24} {:>16} {:>16} {:>16}",
        "ID", "ACCOUNT", "BASELINE", "WHAT-IF", "DELTA"
    );
    // The variant only ever adds accounts, so it lists the baseline's as well
    for summary in variant.account_summaries(None) {
        let base = baseline.account_balance(&summary.account.id, None);
        let _ = writeln!(
            out,
            "{:<8} {:<24} {:>16} {:>16} {:>16}",
            summary.account.id,
            summary.account.label,
            format_currency(base),
            format_currency(summary.balance),
            format_currency(summary.balance - base)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsim_core::{NewAccount, SimulationOptions, TransactionDetails};

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0), "$0.00");
        assert_eq!(format_currency(5), "$0.05");
        assert_eq!(format_currency(123_456_789), "$1,234,567.89");
        assert_eq!(format_currency(-100_000), "-$1,000.00");
        assert_eq!(format_currency(i64::MIN), "-$92,233,720,368,547,758.08");
    }

    #[test]
    fn test_statement_running_balance() {
        let start = jiff::civil::date(2025, 3, 1);
        let mut sim = Simulation::new(SimulationOptions::default().starting(start)).unwrap();
        let checking = sim
            .add_account(NewAccount::new("Checking", "operation"))
            .unwrap();
        sim.add_transaction(
            TransactionDetails::new("bank", checking.clone(), 10_000, "deposit").labelled("Open"),
            None,
        )
        .unwrap();
        sim.add_transaction(
            TransactionDetails::new(checking.clone(), "shop", 2_550, "spend").labelled("Groceries"),
            None,
        )
        .unwrap();

        let statement = account_statement(&sim, &checking);

        assert!(statement.starts_with("Checking (act-1, operation)"));
        assert!(statement.contains("-$25.50"));
        assert!(statement.contains("$74.50"));
        assert!(statement.ends_with("Balance: $74.50\n"));
        assert!(balance_table(&sim).contains("$74.50"));
    }

    #[test]
    fn test_statement_for_unregistered_account() {
        let sim = Simulation::new(SimulationOptions::default()).unwrap();

        let statement = account_statement(&sim, &AccountId::from("ghost"));

        assert!(statement.starts_with("**ghost (ghost, un-registered)"));
        assert!(statement.ends_with("Balance: $0.00\n"));
    }
}
