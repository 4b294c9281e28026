//! Schedule matcher
//!
//! [`is_schedule_now`] answers whether a recurrence rule fires on a given day.
//! It keeps no state: occurrence caps are derived from the elapsed time
//! divided by the step, so the predicate can be evaluated for any date, in
//! any order, any number of times.

use jiff::civil::Date;

use crate::date_math::{days_between, month_diff};
use crate::error::ConfigurationError;
use crate::model::{Period, Schedule};

/// Does `schedule` fire on `now`?
///
/// A schedule never fires before `start_at`, fires on its `end.at` day but
/// not after it, and fires at most `afterXOccurences` times counting the
/// start day. Month and year schedules only fire on the start day-of-month,
/// so a rule starting on the 31st skips shorter months.
pub fn is_schedule_now(schedule: &Schedule, now: Date) -> Result<bool, ConfigurationError> {
    let every = i64::from(schedule.interval()?);

    if now < schedule.start_at {
        return Ok(false);
    }
    if let Some(end) = schedule.ends_at()
        && now > end
    {
        return Ok(false);
    }

    let fires = match schedule.period {
        Period::Once => now == schedule.start_at,
        Period::Days | Period::Weeks => {
            let elapsed = i64::from(days_between(schedule.start_at, now));
            let unit = if schedule.period == Period::Days { 1 } else { 7 };
            on_step(elapsed, unit * every, schedule.occurrence_cap())
        }
        Period::Months | Period::Years => {
            if now.day() != schedule.start_at.day() {
                return Ok(false);
            }
            let elapsed = i64::from(month_diff(schedule.start_at, now));
            let unit = if schedule.period == Period::Months { 1 } else { 12 };
            on_step(elapsed, unit * every, schedule.occurrence_cap())
        }
    };

    Ok(fires)
}

fn on_step(elapsed: i64, step: i64, cap: Option<u32>) -> bool {
    if elapsed % step != 0 {
        return false;
    }
    match cap {
        Some(cap) => elapsed / step < i64::from(cap),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn fires(schedule: &Schedule, d: Date) -> bool {
        is_schedule_now(schedule, d).unwrap()
    }

    #[test]
    fn test_daily_with_occurrence_cap() {
        let schedule = Schedule::daily(date(2022, 1, 1)).every(1).occurrences(5);

        for day in 1..=5 {
            assert!(fires(&schedule, date(2022, 1, day)), "2022-01-{day:02}");
        }
        assert!(!fires(&schedule, date(2021, 12, 31)));
        assert!(!fires(&schedule, date(2022, 1, 6)));
        assert!(!fires(&schedule, date(2022, 1, 7)));
    }

    #[test]
    fn test_weekly_with_occurrence_cap() {
        let schedule = Schedule::weekly(date(2022, 1, 1)).every(1).occurrences(6);

        for d in [
            date(2022, 1, 1),
            date(2022, 1, 8),
            date(2022, 1, 15),
            date(2022, 1, 22),
            date(2022, 1, 29),
            date(2022, 2, 5),
        ] {
            assert!(fires(&schedule, d), "{d}");
        }
        for d in [date(2022, 1, 2), date(2022, 1, 9), date(2022, 2, 12)] {
            assert!(!fires(&schedule, d), "{d}");
        }
    }

    #[test]
    fn test_bimonthly_with_occurrence_cap() {
        let schedule = Schedule::monthly(date(2022, 1, 1)).every(2).occurrences(7);

        for d in [
            date(2022, 1, 1),
            date(2022, 3, 1),
            date(2022, 5, 1),
            date(2022, 7, 1),
            date(2022, 9, 1),
            date(2022, 11, 1),
            date(2023, 1, 1),
        ] {
            assert!(fires(&schedule, d), "{d}");
        }
        for d in [date(2022, 1, 2), date(2022, 2, 1), date(2023, 3, 1)] {
            assert!(!fires(&schedule, d), "{d}");
        }
    }

    #[test]
    fn test_every_five_years_with_occurrence_cap() {
        let schedule = Schedule::yearly(date(2022, 1, 1)).every(5).occurrences(5);

        for year in [2022, 2027, 2032, 2037, 2042] {
            assert!(fires(&schedule, date(year, 1, 1)), "{year}");
        }
        for d in [date(2022, 1, 2), date(2023, 1, 1), date(2047, 1, 1)] {
            assert!(!fires(&schedule, d), "{d}");
        }
    }

    #[test]
    fn test_once_fires_only_on_start_day() {
        let schedule = Schedule::once(date(2022, 6, 15));

        assert!(fires(&schedule, date(2022, 6, 15)));
        assert!(!fires(&schedule, date(2022, 6, 14)));
        assert!(!fires(&schedule, date(2022, 6, 16)));
    }

    #[test]
    fn test_end_at_is_inclusive() {
        let schedule = Schedule::daily(date(2022, 1, 1)).until(date(2022, 1, 3));

        assert!(fires(&schedule, date(2022, 1, 3)));
        assert!(!fires(&schedule, date(2022, 1, 4)));
    }

    #[test]
    fn test_monthly_on_31st_skips_short_months() {
        let schedule = Schedule::monthly(date(2022, 1, 31));

        assert!(fires(&schedule, date(2022, 1, 31)));
        assert!(!fires(&schedule, date(2022, 2, 28)));
        assert!(fires(&schedule, date(2022, 3, 31)));
        assert!(!fires(&schedule, date(2022, 4, 30)));
    }

    #[test]
    fn test_zero_interval_is_configuration_error() {
        let schedule = Schedule::daily(date(2022, 1, 1)).every(0);

        assert_eq!(
            is_schedule_now(&schedule, date(2022, 1, 1)),
            Err(ConfigurationError::InvalidInterval(0))
        );
    }

    #[test]
    fn test_unknown_period_is_configuration_error() {
        assert_eq!(
            "fortnights".parse::<Period>(),
            Err(ConfigurationError::UnknownPeriod("fortnights".to_string()))
        );
        assert_eq!("weeks".parse::<Period>(), Ok(Period::Weeks));
    }

    #[test]
    fn test_evaluation_is_order_independent() {
        let schedule = Schedule::weekly(date(2022, 1, 1)).every(2).occurrences(3);
        let days: Vec<Date> = (0..60)
            .map(|n| crate::date_math::add_days(date(2022, 1, 1), n))
            .collect();

        let forward: Vec<bool> = days.iter().map(|d| fires(&schedule, *d)).collect();
        let backward: Vec<bool> = days.iter().rev().map(|d| fires(&schedule, *d)).collect();
        let backward: Vec<bool> = backward.into_iter().rev().collect();

        assert_eq!(forward, backward);
        assert_eq!(forward.iter().filter(|f| **f).count(), 3);
    }
}
