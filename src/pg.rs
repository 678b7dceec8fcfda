use chrono::NaiveDate;
use postgres_types::Date;

use crate::LocalDate;

impl LocalDate {
    /// Maps onto the driver-level DATE representation: either sentinel
    /// becomes the matching infinity variant (which carries no calendar
    /// value), a finite date carries its calendar value. SQL NULL stays
    /// with the caller as `Option<LocalDate>`, mapped over this
    /// conversion.
    pub fn pg_date(self) -> Date<NaiveDate> {
        match self.infinity_modifier() {
            1 => Date::PosInfinity,
            -1 => Date::NegInfinity,
            _ => match self.to_naive() {
                Some(date) => Date::Value(date),
                // finite day counts past the calendar range saturate the
                // same way the arithmetic does
                None => {
                    if self.days() > 0 {
                        Date::PosInfinity
                    } else {
                        Date::NegInfinity
                    }
                }
            },
        }
    }
}

impl From<LocalDate> for Date<NaiveDate> {
    fn from(date: LocalDate) -> Self {
        date.pg_date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_map_to_infinity_variants() {
        assert!(matches!(LocalDate::infinity().pg_date(), Date::PosInfinity));
        assert!(matches!(
            LocalDate::neg_infinity().pg_date(),
            Date::NegInfinity
        ));
    }

    #[test]
    fn test_finite_dates_carry_their_calendar_value() {
        match LocalDate::from_ymd(2023, 5, 15).pg_date() {
            Date::Value(date) => assert_eq!(Some(date), NaiveDate::from_ymd_opt(2023, 5, 15)),
            other => panic!("expected a finite DATE, got {other:?}"),
        }
        match LocalDate::from_days(0).pg_date() {
            Date::Value(date) => assert_eq!(Some(date), NaiveDate::from_ymd_opt(1970, 1, 1)),
            other => panic!("expected a finite DATE, got {other:?}"),
        }
    }

    #[test]
    fn test_from_impl_matches_method() {
        let converted: Date<NaiveDate> = LocalDate::neg_infinity().into();
        assert!(matches!(converted, Date::NegInfinity));
    }
}
