//! Calendar arithmetic on `jiff::civil::Date` without going through `Span`.
//!
//! Day differences use Rata Die day-numbering so that stepping the clock and
//! evaluating day/week schedules stay O(1) with no `Span` normalisation in the
//! tick loop. Month differences are plain calendar arithmetic.

use jiff::civil::Date;

/// Convert a civil date to a Rata Die day number (days since 0001-01-01).
#[inline]
fn rata_die(d: Date) -> i32 {
    let y = d.year() as i32;
    let m = d.month() as i32;
    let day = d.day() as i32;

    // March = month 1, so February closes the "year"
    let a = (14 - m) / 12;
    let y2 = y - a;
    let m2 = m + 12 * a - 3;

    day + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 306
}

/// Inverse of [`rata_die`].
#[inline]
fn rd_to_date(rd: i32) -> Date {
    let z = rd + 306;
    let h = 100 * z - 25;
    let a = h / 3_652_425;
    let b = a - a / 4;
    let y = (100 * b + h) / 36_525;
    let c = b + z - 365 * y - y / 4;
    let m = (5 * c + 456) / 153;
    let day = c - (153 * m - 457) / 5;

    let (year, month) = if m > 12 { (y + 1, m - 12) } else { (y, m) };

    jiff::civil::date(year as i16, month as i8, day as i8)
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
#[inline]
pub fn days_between(from: Date, to: Date) -> i32 {
    rata_die(to) - rata_die(from)
}

/// Add `n` days (possibly negative) to a date.
#[inline]
pub fn add_days(d: Date, n: i32) -> Date {
    rd_to_date(rata_die(d) + n)
}

/// Calendar months from `from` to `to`.
///
/// The partial final month only counts once its day-of-month has been
/// reached, so `2022-01-05 -> 2022-02-01` is 0 and `2022-01-05 -> 2022-02-05`
/// is 1.
pub fn month_diff(from: Date, to: Date) -> i32 {
    let years = (to.year() as i32 - from.year() as i32) * 12;
    let months = to.month() as i32 - from.month() as i32;
    let offset = if to.day() >= from.day() { 0 } else { -1 };

    years + months + offset
}
