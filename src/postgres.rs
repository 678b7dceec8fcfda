use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgHasArrayType, PgTypeInfo, PgValueFormat, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type};

use crate::consts::{DAYS_INFINITY, DAYS_NEG_INFINITY};
use crate::LocalDate;

/// Days between the Unix epoch and the Postgres DATE epoch (2000-01-01).
const PG_EPOCH_DAYS: i32 = 10_957;

/// A finite day count that cannot be rebased onto the Postgres DATE epoch
/// without leaving the 32-bit wire domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("date {days} days from the Unix epoch is out of range for a Postgres DATE")]
pub struct OutOfRangeError {
    pub days: i32,
}

/// Rebases a day count onto the 2000-01-01 wire epoch. Sentinels pass
/// through unchanged: the binary DATE format reserves the same extreme
/// values for its own infinities.
fn to_pg_days(date: LocalDate) -> Result<i32, OutOfRangeError> {
    if date.is_infinity() || date.is_neg_infinity() {
        return Ok(date.days());
    }
    date.days()
        .checked_sub(PG_EPOCH_DAYS)
        .filter(|days| *days != DAYS_INFINITY && *days != DAYS_NEG_INFINITY)
        .ok_or(OutOfRangeError { days: date.days() })
}

fn from_pg_days(days: i32) -> Result<LocalDate, OutOfRangeError> {
    match days {
        DAYS_INFINITY => Ok(LocalDate::infinity()),
        DAYS_NEG_INFINITY => Ok(LocalDate::neg_infinity()),
        _ => days
            .checked_add(PG_EPOCH_DAYS)
            .filter(|days| *days != DAYS_INFINITY && *days != DAYS_NEG_INFINITY)
            .map(LocalDate::from_days)
            .ok_or(OutOfRangeError { days }),
    }
}

impl Type<Postgres> for LocalDate {
    fn type_info() -> PgTypeInfo {
        // 1082 => PgType::Date
        PgTypeInfo::with_oid(Oid(1082))
    }
}

impl PgHasArrayType for LocalDate {
    fn array_type_info() -> PgTypeInfo {
        // 1182 => PgType::DateArray
        PgTypeInfo::with_oid(Oid(1182))
    }
}

impl Encode<'_, Postgres> for LocalDate {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        // DATE is encoded as days since 2000-01-01; infinities keep their
        // reserved encodings
        let days = to_pg_days(*self)?;
        Encode::<Postgres>::encode(days, buf)
    }

    fn size_hint(&self) -> usize {
        size_of::<i32>()
    }
}

impl<'r> Decode<'r, Postgres> for LocalDate {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        match value.format() {
            PgValueFormat::Binary => {
                let days: i32 = Decode::<Postgres>::decode(value)?;
                Ok(from_pg_days(days)?)
            }
            PgValueFormat::Text => Ok(value.as_str()?.parse::<LocalDate>()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pg_epoch_anchor() {
        assert_eq!(to_pg_days(LocalDate::from_ymd(2000, 1, 1)).unwrap(), 0);
        assert_eq!(from_pg_days(0).unwrap(), LocalDate::from_ymd(2000, 1, 1));
    }

    #[test]
    fn test_pg_days_round_trip() {
        for date in [
            LocalDate::from_ymd(2023, 5, 15),
            LocalDate::from_ymd(1970, 1, 1),
            LocalDate::from_ymd(1969, 12, 31),
            LocalDate::from_ymd(1, 1, 1),
        ] {
            let rebased = to_pg_days(date).unwrap();
            assert_eq!(rebased, date.days() - PG_EPOCH_DAYS);
            assert_eq!(from_pg_days(rebased).unwrap(), date);
        }
    }

    #[test]
    fn test_pg_days_sentinels_pass_through() {
        assert_eq!(to_pg_days(LocalDate::infinity()).unwrap(), DAYS_INFINITY);
        assert_eq!(
            to_pg_days(LocalDate::neg_infinity()).unwrap(),
            DAYS_NEG_INFINITY
        );
        assert_eq!(from_pg_days(DAYS_INFINITY).unwrap(), LocalDate::infinity());
        assert_eq!(
            from_pg_days(DAYS_NEG_INFINITY).unwrap(),
            LocalDate::neg_infinity()
        );
    }

    #[test]
    fn test_pg_days_out_of_range() {
        // rebasing these would underflow or collide with a reserved
        // encoding
        assert!(to_pg_days(LocalDate::from_days(i32::MIN + 1)).is_err());
        assert!(to_pg_days(LocalDate::from_days(i32::MIN + PG_EPOCH_DAYS)).is_err());
        assert!(from_pg_days(i32::MAX - 1).is_err());
        assert!(from_pg_days(i32::MAX - PG_EPOCH_DAYS).is_err());
    }
}
