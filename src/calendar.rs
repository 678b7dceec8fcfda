use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_MONTH,
};

/// 1970-01-01, the zero point of the day-count encoding.
pub(crate) fn unix_epoch_date() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

/// Proleptic-Gregorian leap year rule (4/100/400).
pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: u32) -> u32 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Resolves a possibly out-of-range (year, month, day) triple to a concrete
/// calendar date with standard carry: months fold into years first, then the
/// day component is applied as a signed offset from the first of the
/// normalized month. Month 13 of a year is January of the next; day 0 is the
/// last day of the previous month. Returns `None` when the result leaves the
/// representable calendar range.
pub(crate) fn normalize_ymd(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
    let months = i64::from(month) - 1;
    let year = i64::from(year) + months.div_euclid(i64::from(MAX_MONTH));
    let month = months.rem_euclid(i64::from(MAX_MONTH)) + 1;

    let first = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month as u32, 1)?;
    first.checked_add_signed(Duration::days(i64::from(day) - 1))
}
