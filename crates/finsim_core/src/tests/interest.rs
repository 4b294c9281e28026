//! Tests for interest driven through the tick loop
//!
//! These tests verify:
//! - Simple interest posts on schedule days only
//! - Two-phase interest accrues daily and capitalises on apply days
//! - Custom calculators registered at runtime are used by name

use jiff::civil::{Date, date};

use super::{START, simulation_at};
use crate::interest::INTEREST_SOURCE;
use crate::model::{AccountId, Interest, NewAccount, Schedule, TransactionDetails};
use crate::simulation::Simulation;

fn deposit(sim: &mut Simulation, to: &AccountId, amount: i64) {
    let details = TransactionDetails::new("deposit", to.clone(), amount, "deposit");
    sim.add_transaction(details, None).unwrap();
}

#[test]
fn test_monthly_simple_interest() {
    let mut sim = simulation_at(START);
    // 5% monthly
    let savings = sim
        .add_account(
            NewAccount::new("Savings", "saving")
                .with_interest(Interest::new(5_000, Schedule::monthly(START))),
        )
        .unwrap();
    deposit(&mut sim, &savings, 10_000);

    sim.run_until(|s, _| s.current_date() >= date(2022, 1, 31))
        .unwrap();
    assert_eq!(sim.account_balance(&savings, None), 10_000);

    sim.tick().unwrap();
    assert_eq!(sim.current_date(), date(2022, 2, 1));
    assert_eq!(sim.account_balance(&savings, None), 10_500);

    sim.run_until(|s, _| s.current_date() >= date(2022, 3, 1))
        .unwrap();
    assert_eq!(sim.account_balance(&savings, None), 11_025);
    assert_eq!(
        sim.account_balance(&AccountId::from(INTEREST_SOURCE), None),
        -1_025
    );
}

#[test]
fn test_daily_accrual_monthly_capitalisation() {
    let mut sim = simulation_at(START);
    let interest = Interest::split(
        14,
        Schedule::daily(START),
        Schedule::monthly(date(2022, 2, 1)),
    );
    let savings = sim
        .add_account(NewAccount::new("Savings", "saving").with_interest(interest))
        .unwrap();
    deposit(&mut sim, &savings, 12_345);
    let pending = savings.pending_interest();

    sim.run_until(|s, _| s.current_date() >= date(2022, 1, 31))
        .unwrap();
    // 30 accruals of 14 * 12_345, principal untouched
    assert_eq!(sim.account_balance(&savings, None), 12_345);
    assert_eq!(sim.account_balance(&pending, None), 30 * 14 * 12_345);

    sim.tick().unwrap();
    // 31 accruals = 5_357_730 scaled = 53 minor units, remainder stays pending
    assert_eq!(sim.account_balance(&savings, None), 12_398);
    assert_eq!(sim.account_balance(&pending, None), 57_730);
    assert!(sim.transactions().iter().all(|tx| tx.details.amount >= 0));
}

#[test]
fn test_capitalisation_is_paid_from_pending_account() {
    let mut sim = simulation_at(START);
    let interest = Interest::split(
        1_000,
        Schedule::daily(START),
        Schedule::weekly(date(2022, 1, 7)),
    );
    let savings = sim
        .add_account(NewAccount::new("Savings", "saving").with_interest(interest))
        .unwrap();
    deposit(&mut sim, &savings, 1_000);
    let pending = savings.pending_interest();

    sim.run_until(|_, i| i >= 5).unwrap();
    let report = sim.tick().unwrap();

    // Accrual and capitalisation on the same day post two transactions
    assert_eq!(report.date, date(2022, 1, 7));
    assert_eq!(report.posted.len(), 2);
    let interest_tx = sim.account_debits(&savings, None).pop().unwrap();
    assert_eq!(interest_tx.details.from_account_id, pending);
    assert_eq!(interest_tx.details.amount, 60);
    assert_eq!(interest_tx.details.kind, "interest");
    assert_eq!(sim.account_balance(&savings, None), 1_060);
    assert_eq!(sim.account_balance(&pending, None), 0);
    assert_eq!(
        sim.account_balance(&AccountId::from(INTEREST_SOURCE), None),
        -60
    );
}

#[test]
fn test_runtime_calculator_registration() {
    let mut sim = simulation_at(START);
    // Pays the rate as a flat number of minor units regardless of balance
    sim.define_interest_calculator("flat", |interest: &Interest, _: i64, _: Date| {
        i128::from(interest.rate) * 100 * 1000
    });
    let account = sim
        .add_account(
            NewAccount::new("Bonus", "saving")
                .with_interest(Interest::new(3, Schedule::weekly(START)).with_calculator("flat")),
        )
        .unwrap();

    sim.run_until(|_, i| i >= 21).unwrap();

    // Fires on Jan 8, 15 and 22
    assert_eq!(sim.account_balance(&account, None), 9);
}

#[test]
fn test_interest_on_empty_account_posts_nothing() {
    let mut sim = simulation_at(START);
    let interest = Interest::new(5_000, Schedule::daily(START));
    sim.add_account(NewAccount::new("Empty", "saving").with_interest(interest))
        .unwrap();

    sim.run_until(|_, i| i >= 10).unwrap();

    assert!(sim.transactions().is_empty());
}
