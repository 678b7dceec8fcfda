mod calendar;
mod consts;
mod pg;
#[cfg(feature = "sqlx")]
mod postgres;
mod prelude;

pub use calendar::{days_in_month, is_leap_year};
pub use consts::*;
#[cfg(feature = "sqlx")]
pub use postgres::OutOfRangeError;

use crate::prelude::*;
use calendar::{normalize_ymd, unix_epoch_date};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// A calendar date, stored as a day count since the Unix epoch
/// (1970-01-01, UTC), with the extremes of the 32-bit domain reserved as
/// the `infinity` and `-infinity` sentinels used by open-ended validity
/// intervals.
///
/// Because the sentinels are ordinary values of the same field, the derived
/// ordering over the raw day count is already correct: negative infinity
/// sorts before every finite date and positive infinity after, with no
/// special-casing. Absence of a date (SQL NULL) is `Option<LocalDate>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDate(i32);

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0} (expected YYYY-MM-DD)")]
    InvalidFormat(String),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u32),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl LocalDate {
    /// The positive-infinity sentinel, a date after every finite date.
    pub const fn infinity() -> Self {
        Self(DAYS_INFINITY)
    }

    /// The negative-infinity sentinel, a date before every finite date.
    pub const fn neg_infinity() -> Self {
        Self(DAYS_NEG_INFINITY)
    }

    /// Wraps a raw day count since 1970-01-01.
    pub const fn from_days(days: i32) -> Self {
        Self(days)
    }

    /// Builds a date from a (year, month, day) triple interpreted as a UTC
    /// calendar date.
    ///
    /// Out-of-range components carry into adjacent months and years the
    /// way a conventional calendar normalizer resolves them:
    /// `from_ymd(2023, 13, 1)` is 2024-01-01 and `from_ymd(2023, 2, 31)`
    /// is 2023-03-03. Results beyond the representable calendar range
    /// saturate to the matching sentinel.
    pub fn from_ymd(year: i32, month: i32, day: i32) -> Self {
        match normalize_ymd(year, month, day) {
            Some(date) => Self::from_naive(date),
            None => {
                if year > 1970 {
                    Self::infinity()
                } else {
                    Self::neg_infinity()
                }
            }
        }
    }

    /// Today's date, in UTC.
    pub fn today() -> Self {
        Self::from_naive(Utc::now().date_naive())
    }

    /// The calendar date of `instant`, taken in UTC. Instants carrying
    /// another offset convert first, so callers near their zone's midnight
    /// may observe a different day than their local calendar shows.
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::from_naive(instant.with_timezone(&Utc).date_naive())
    }

    fn from_naive(date: NaiveDate) -> Self {
        let days = date.signed_duration_since(unix_epoch_date()).num_days();
        // the whole proleptic calendar range fits in i32 days; saturate
        // into the sentinels if it ever does not
        Self(i32::try_from(days).unwrap_or(if days > 0 {
            DAYS_INFINITY
        } else {
            DAYS_NEG_INFINITY
        }))
    }

    /// Raw day count since 1970-01-01, sentinel encodings included.
    pub const fn days(self) -> i32 {
        self.0
    }

    /// `true` for the positive-infinity sentinel.
    pub const fn is_infinity(self) -> bool {
        self.0 == DAYS_INFINITY
    }

    /// `true` for the negative-infinity sentinel.
    pub const fn is_neg_infinity(self) -> bool {
        self.0 == DAYS_NEG_INFINITY
    }

    /// `+1` for positive infinity, `-1` for negative infinity, `0` for a
    /// finite date. The signed indicator the persistence adapters key on.
    pub const fn infinity_modifier(self) -> i32 {
        match self.0 {
            DAYS_INFINITY => 1,
            DAYS_NEG_INFINITY => -1,
            _ => 0,
        }
    }

    /// The concrete calendar date, or `None` for either sentinel.
    pub fn to_naive(self) -> Option<NaiveDate> {
        if self.is_infinity() || self.is_neg_infinity() {
            return None;
        }
        unix_epoch_date().checked_add_signed(Duration::days(i64::from(self.0)))
    }

    /// The UTC instant at 00:00:00 on this date. `None` for either
    /// sentinel: there is no meaningful instant for an infinite date.
    pub fn to_utc_midnight(self) -> Option<DateTime<Utc>> {
        if self.is_infinity() || self.is_neg_infinity() {
            return None;
        }
        DateTime::from_timestamp(i64::from(self.0) * SECONDS_PER_DAY, 0)
    }

    /// `true` if `self` sorts strictly after `other`.
    pub const fn is_after(self, other: Self) -> bool {
        self.0 > other.0
    }

    /// `true` if `self` sorts strictly before `other`.
    pub const fn is_before(self, other: Self) -> bool {
        self.0 < other.0
    }

    /// Inclusive range test over the raw encoding. An inverted range
    /// (`from` positive infinity, `to` negative infinity) therefore holds
    /// no finite date; a needle equal to both bounds still matches.
    pub const fn is_between(self, from: Self, to: Self) -> bool {
        from.0 <= self.0 && self.0 <= to.0
    }

    /// Shifts a finite date by a number of days. Either infinity absorbs
    /// the shift and is returned unchanged. Additions leaving the finite
    /// 32-bit domain saturate onto the matching sentinel.
    pub fn add_days(self, days: i32) -> Self {
        if self.is_infinity() || self.is_neg_infinity() {
            return self;
        }
        Self(self.0.saturating_add(days))
    }

    /// Shifts by calendar components. The year and month shifts apply
    /// first; the day shift then runs against the normalized month, so
    /// `2023-01-31` plus one month is `2023-03-03` and `2020-02-29` plus
    /// one year is `2021-03-01`. Either infinity is returned unchanged.
    pub fn add_date(self, years: i32, months: i32, days: i32) -> Self {
        if self.is_infinity() || self.is_neg_infinity() {
            return self;
        }
        match self.to_naive() {
            Some(date) => Self::from_ymd(
                date.year().saturating_add(years),
                (date.month() as i32).saturating_add(months),
                (date.day() as i32).saturating_add(days),
            ),
            // no (year, month, day) decomposition outside the calendar range
            None => self,
        }
    }
}

impl LocalDate {
    /// Strict `YYYY-MM-DD` parse: exact 4-2-2 digit grouping, no
    /// normalization, calendar-impossible dates rejected.
    fn parse_iso(s: &str) -> Result<Self, ParseError> {
        let bytes = s.as_bytes();
        if bytes.len() != 10 || !s.is_ascii() || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(ParseError::InvalidFormat(s.to_owned()));
        }

        let year = Self::parse_component(&s[0..4], s)? as i32;
        let month = Self::parse_component(&s[5..7], s)?;
        let day = Self::parse_component(&s[8..10], s)?;

        if !(1..=MAX_MONTH).contains(&month) {
            return Err(ParseError::InvalidMonth(month));
        }
        if !(MIN_DAY..=days_in_month(year, month)).contains(&day) {
            return Err(ParseError::InvalidDay { year, month, day });
        }

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(ParseError::InvalidDay { year, month, day })?;
        Ok(Self::from_naive(date))
    }

    /// Fixed-width field parse. `u32::from_str` alone would admit a
    /// leading `+`.
    fn parse_component(field: &str, full: &str) -> Result<u32, ParseError> {
        if !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidFormat(full.to_owned()));
        }
        field
            .parse()
            .map_err(|_| ParseError::InvalidFormat(full.to_owned()))
    }
}

impl FromStr for LocalDate {
    type Err = ParseError;

    /// Decodes the textual encoding: the exact `infinity` / `-infinity`
    /// tokens (case-sensitive), else the strict `YYYY-MM-DD` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(ParseError::EmptyInput),
            INFINITY => Ok(Self::infinity()),
            NEG_INFINITY => Ok(Self::neg_infinity()),
            _ => Self::parse_iso(s),
        }
    }
}

impl fmt::Display for LocalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinity() {
            return f.write_str(INFINITY);
        }
        if self.is_neg_infinity() {
            return f.write_str(NEG_INFINITY);
        }
        // finite day counts outside the proleptic calendar range clamp to
        // its bounds
        let date = self.to_naive().unwrap_or(if self.0 > 0 {
            NaiveDate::MAX
        } else {
            NaiveDate::MIN
        });
        write!(
            f,
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for LocalDate {
    fn from(instant: DateTime<Tz>) -> Self {
        Self::from_datetime(&instant)
    }
}

impl serde::Serialize for LocalDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for LocalDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
