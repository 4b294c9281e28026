//! Interest accrual
//!
//! Rates are integers scaled by the simulation's interest precision and
//! expressed in percent, so a calculator's raw output is in units of
//! `minor units * 100 * precision`. Simple interest converts straight back to
//! minor units. Two-phase interest parks the raw amount in a per-account
//! pending account and only converts on apply days, which lets daily accrual
//! of sub-unit amounts add up before being capitalised.

use std::fmt;
use std::sync::Arc;

use jiff::civil::Date;
use rustc_hash::FxHashMap;

use crate::error::{ConfigurationError, Result, SimError};
use crate::model::{
    Account, AccountId, INTEREST, Interest, InterestSchedule, PENDING_INTEREST,
    TransactionDetails,
};
use crate::schedule::is_schedule_now;

/// Name of the built-in calculator
pub const FULL_RATE: &str = "full";

/// Synthetic account interest is paid out of (and charged into)
pub const INTEREST_SOURCE: &str = "interest-source";

/// Strategy turning a balance into a raw (scaled) interest amount
pub trait InterestCalculator: Send + Sync {
    fn compute(&self, interest: &Interest, balance: i64, date: Date) -> i128;
}

impl<F> InterestCalculator for F
where
    F: Fn(&Interest, i64, Date) -> i128 + Send + Sync,
{
    fn compute(&self, interest: &Interest, balance: i64, date: Date) -> i128 {
        self(interest, balance, date)
    }
}

/// `rate * balance`
#[derive(Debug, Clone, Copy, Default)]
pub struct FullRate;

impl InterestCalculator for FullRate {
    fn compute(&self, interest: &Interest, balance: i64, _date: Date) -> i128 {
        i128::from(interest.rate) * i128::from(balance)
    }
}

/// Named calculators, seeded with [`FULL_RATE`]
#[derive(Clone)]
pub struct CalculatorRegistry {
    calculators: FxHashMap<String, Arc<dyn InterestCalculator>>,
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        let mut registry = Self {
            calculators: FxHashMap::default(),
        };
        registry.define(FULL_RATE, FullRate);
        registry
    }
}

impl fmt::Debug for CalculatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl CalculatorRegistry {
    /// Register or replace a calculator.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        calculator: impl InterestCalculator + 'static,
    ) {
        let name = name.into();
        tracing::debug!(%name, "defining interest calculator");
        self.calculators.insert(name, Arc::new(calculator));
    }

    pub fn get(&self, name: &str) -> Result<&dyn InterestCalculator, ConfigurationError> {
        self.calculators
            .get(name)
            .map(|c| c.as_ref())
            .ok_or_else(|| ConfigurationError::UnknownInterestCalculator(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.calculators.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.calculators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Which interest steps are due for one account on one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccrualPlan {
    pub calc: bool,
    pub apply: bool,
}

impl AccrualPlan {
    pub fn is_idle(&self) -> bool {
        !self.calc && !self.apply
    }
}

/// Evaluate the interest schedules of `interest` on `date`, and make sure the
/// referenced calculator exists.
pub fn plan_accrual(
    interest: &Interest,
    registry: &CalculatorRegistry,
    date: Date,
) -> Result<AccrualPlan, ConfigurationError> {
    let plan = match &interest.schedule {
        InterestSchedule::Single(schedule) => {
            let due = is_schedule_now(schedule, date)?;
            AccrualPlan {
                calc: due,
                apply: due,
            }
        }
        InterestSchedule::Split { calc, apply } => AccrualPlan {
            calc: is_schedule_now(calc, date)?,
            apply: is_schedule_now(apply, date)?,
        },
    };
    if !plan.is_idle() {
        registry.get(interest.calculator_name())?;
    }
    Ok(plan)
}

/// Interest transactions `plan` calls for on `account`, not yet posted.
///
/// `balance` reads an account's balance as of the tick being evaluated,
/// including postings decided earlier in that tick. Nothing is written, so a
/// failure here leaves the ledger as it was.
pub fn accrual_postings(
    balance: impl Fn(&AccountId) -> i64,
    registry: &CalculatorRegistry,
    account: &Account,
    interest: &Interest,
    plan: AccrualPlan,
    precision: i64,
    date: Date,
) -> Result<Vec<TransactionDetails>> {
    let scale = 100 * i128::from(precision);
    let source = AccountId::from(INTEREST_SOURCE);
    let label = format!("interest on {}", account.label);
    let mut postings = Vec::new();

    let raw_interest = || -> Result<i128> {
        let calculator = registry.get(interest.calculator_name())?;
        Ok(calculator.compute(interest, balance(&account.id), date))
    };

    match interest.schedule {
        InterestSchedule::Single(_) => {
            if plan.apply {
                let amount = raw_interest()?.div_euclid(scale);
                postings.extend(signed_transfer(
                    &source, &account.id, amount, INTEREST, &label,
                )?);
            }
        }
        InterestSchedule::Split { .. } => {
            let pending = account.id.pending_interest();
            let raw = if plan.calc { raw_interest()? } else { 0 };
            if !plan.apply {
                tracing::debug!(account_id = %account.id, raw, "accruing pending interest");
                postings.extend(signed_transfer(
                    &source, &pending, raw, PENDING_INTEREST, &label,
                )?);
                return Ok(postings);
            }

            let accrued = i128::from(balance(&pending)) + raw;
            let applied = accrued.div_euclid(scale);
            // Pending holds scaled units: of the `applied * scale` capitalised,
            // `applied` moves to the principal and the rest returns to the
            // source, netted against today's accrual.
            let adjustment = raw - applied * (scale - 1);
            tracing::debug!(account_id = %account.id, accrued, applied, "applying interest");
            postings.extend(signed_transfer(
                &source, &pending, adjustment, PENDING_INTEREST, &label,
            )?);
            postings.extend(signed_transfer(
                &pending, &account.id, applied, INTEREST, &label,
            )?);
        }
    }

    Ok(postings)
}

/// A transfer of a signed amount, flipping direction for negatives so the
/// ledger only ever holds non-negative amounts. Zero yields nothing.
fn signed_transfer(
    from: &AccountId,
    to: &AccountId,
    amount: i128,
    kind: &str,
    label: &str,
) -> Result<Option<TransactionDetails>> {
    if amount == 0 {
        return Ok(None);
    }
    let (from, to) = if amount < 0 { (to, from) } else { (from, to) };
    let amount =
        i64::try_from(amount.unsigned_abs()).map_err(|_| SimError::AmountOverflow(amount))?;
    Ok(Some(
        TransactionDetails::new(from.clone(), to.clone(), amount, kind).labelled(label),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::model::{NewAccount, Schedule, TransactionId};
    use jiff::civil::date;

    const PRECISION: i64 = 1000;

    fn accrue(
        ledger: &mut Ledger,
        registry: &CalculatorRegistry,
        account: &Account,
        interest: &Interest,
        plan: AccrualPlan,
        day: Date,
    ) -> Vec<TransactionId> {
        let postings = accrual_postings(
            |id| ledger.balance(id, None),
            registry,
            account,
            interest,
            plan,
            PRECISION,
            day,
        )
        .unwrap();
        postings
            .into_iter()
            .map(|details| ledger.add_transaction(details, day))
            .collect()
    }

    fn funded_account(ledger: &mut Ledger, interest: Interest, amount: i64) -> Account {
        let id = ledger.add_account(NewAccount::new("Savings", "saving").with_interest(interest));
        ledger.add_transaction(
            TransactionDetails::new("deposit", id.clone(), amount, "deposit"),
            date(2022, 1, 1),
        );
        ledger.account(&id).cloned().unwrap()
    }

    #[test]
    fn test_simple_interest_posts_floor_of_scaled_amount() {
        let mut ledger = Ledger::new();
        let registry = CalculatorRegistry::default();
        // 5% on 1_010 = 50.5 -> 50
        let interest = Interest::new(5_000, Schedule::monthly(date(2022, 1, 1)));
        let account = funded_account(&mut ledger, interest.clone(), 1_010);

        let day = date(2022, 2, 1);
        let plan = plan_accrual(&interest, &registry, day).unwrap();
        let posted = accrue(&mut ledger, &registry, &account, &interest, plan, day);

        assert_eq!(posted.len(), 1);
        assert_eq!(ledger.balance(&account.id, None), 1_060);
        assert_eq!(ledger.balance(&AccountId::from(INTEREST_SOURCE), None), -50);
    }

    #[test]
    fn test_simple_interest_skipped_off_schedule() {
        let registry = CalculatorRegistry::default();
        let interest = Interest::new(5_000, Schedule::monthly(date(2022, 1, 1)));

        let plan = plan_accrual(&interest, &registry, date(2022, 2, 2)).unwrap();
        assert!(plan.is_idle());
    }

    #[test]
    fn test_negative_balance_charges_interest_in_reverse() {
        let mut ledger = Ledger::new();
        let registry = CalculatorRegistry::default();
        let interest = Interest::new(10_000, Schedule::daily(date(2022, 1, 1)));
        let id =
            ledger.add_account(NewAccount::new("Loan", "loan").with_interest(interest.clone()));
        ledger.add_transaction(
            TransactionDetails::new(id.clone(), "checking", 1_000, "loan"),
            date(2022, 1, 1),
        );
        let account = ledger.account(&id).cloned().unwrap();

        let day = date(2022, 1, 2);
        let plan = plan_accrual(&interest, &registry, day).unwrap();
        accrue(&mut ledger, &registry, &account, &interest, plan, day);

        assert_eq!(ledger.balance(&id, None), -1_100);
        assert!(ledger.transactions().iter().all(|tx| tx.details.amount >= 0));
    }

    #[test]
    fn test_two_phase_accrues_then_capitalises_with_remainder() {
        let mut ledger = Ledger::new();
        let registry = CalculatorRegistry::default();
        // 1% per daily calc on 1_000 = 10 per day, scaled
        let interest = Interest::split(
            1_000,
            Schedule::daily(date(2022, 1, 1)),
            Schedule::weekly(date(2022, 1, 7)),
        );
        let account = funded_account(&mut ledger, interest.clone(), 1_000);
        let pending = account.id.pending_interest();

        for day in 1..=6 {
            let d = date(2022, 1, day);
            let plan = plan_accrual(&interest, &registry, d).unwrap();
            assert!(plan.calc && !plan.apply);
            accrue(&mut ledger, &registry, &account, &interest, plan, d);
        }
        assert_eq!(ledger.balance(&account.id, None), 1_000);
        assert_eq!(ledger.balance(&pending, None), 6 * 1_000 * 1_000);

        let d = date(2022, 1, 7);
        let plan = plan_accrual(&interest, &registry, d).unwrap();
        assert!(plan.calc && plan.apply);
        let posted = accrue(&mut ledger, &registry, &account, &interest, plan, d);

        // Today's accrual is netted with the capitalisation leftover, and the
        // principal is paid out of the pending account
        assert_eq!(posted.len(), 2);
        let txs = &ledger.transactions()[ledger.transactions().len() - 2..];
        assert_eq!(txs[0].details.from_account_id, pending);
        assert_eq!(txs[0].details.to_account_id.as_str(), INTEREST_SOURCE);
        assert_eq!(txs[0].details.amount, 5_999_930);
        assert_eq!(txs[1].details.from_account_id, pending);
        assert_eq!(txs[1].details.to_account_id, account.id);
        assert_eq!(txs[1].details.amount, 70);
        assert_eq!(txs[1].details.kind, INTEREST);

        assert_eq!(ledger.balance(&account.id, None), 1_070);
        assert_eq!(ledger.balance(&pending, None), 0);
        assert_eq!(ledger.balance(&AccountId::from(INTEREST_SOURCE), None), -70);
    }

    #[test]
    fn test_apply_only_day_keeps_remainder_pending() {
        let mut ledger = Ledger::new();
        let registry = CalculatorRegistry::default();
        let interest = Interest::split(
            1_234,
            Schedule::once(date(2022, 1, 1)),
            Schedule::once(date(2022, 1, 2)),
        );
        let account = funded_account(&mut ledger, interest.clone(), 1_000);
        let pending = account.id.pending_interest();

        for d in [date(2022, 1, 1), date(2022, 1, 2)] {
            let plan = plan_accrual(&interest, &registry, d).unwrap();
            let posted = accrue(&mut ledger, &registry, &account, &interest, plan, d);
            assert!(posted.len() <= 2);
        }

        // 1_234_000 scaled: 12 capitalised, 34_000 carried
        assert_eq!(ledger.balance(&account.id, None), 1_012);
        assert_eq!(ledger.balance(&pending, None), 34_000);
        assert_eq!(
            ledger.balance(&AccountId::from(INTEREST_SOURCE), None),
            -34_012
        );
    }

    #[test]
    fn test_custom_calculator_is_dispatched_by_name() {
        let mut ledger = Ledger::new();
        let mut registry = CalculatorRegistry::default();
        registry.define("flat", |_: &Interest, _: i64, _: Date| -> i128 { 100 * 1000 * 7 });
        let interest =
            Interest::new(0, Schedule::daily(date(2022, 1, 1))).with_calculator("flat");
        let account = funded_account(&mut ledger, interest.clone(), 0);

        let d = date(2022, 1, 3);
        let plan = plan_accrual(&interest, &registry, d).unwrap();
        accrue(&mut ledger, &registry, &account, &interest, plan, d);

        assert_eq!(ledger.balance(&account.id, None), 7);
        assert_eq!(registry.names(), vec!["flat", FULL_RATE]);
    }

    #[test]
    fn test_unknown_calculator_is_configuration_error() {
        let registry = CalculatorRegistry::default();
        let interest =
            Interest::new(5_000, Schedule::daily(date(2022, 1, 1))).with_calculator("compound");

        assert_eq!(
            plan_accrual(&interest, &registry, date(2022, 1, 1)),
            Err(ConfigurationError::UnknownInterestCalculator(
                "compound".to_string()
            ))
        );
    }
}
