use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use parquet::data_type::Int96;

use crate::schema::TimeUnit;

const NANOS_PER_DAY: i128 = 86_400 * 1_000_000_000;

/// Julian day number of 1970-01-01
const JULIAN_DAY_OF_EPOCH: i128 = 2_440_588;

/// Days since the epoch for `YYYY-MM-DD`
pub fn parse_date(text: &str) -> Option<i32> {
    let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    i32::try_from(date.signed_duration_since(epoch).num_days()).ok()
}

/// Time of day for `HH:MM:SS[.fraction]` in the given unit
pub fn parse_time(text: &str, unit: TimeUnit) -> Option<i64> {
    let time = NaiveTime::parse_from_str(text.trim(), "%H:%M:%S%.f").ok()?;
    let seconds = time.num_seconds_from_midnight() as i64;
    let nanos = time.nanosecond() as i64;
    Some(seconds * unit.per_second() + nanos / (1_000_000_000 / unit.per_second()))
}

/// Instant for RFC 3339 text, or a naive `YYYY-MM-DD[T ]HH:MM:SS[.fraction]`
/// read as UTC, in the given unit
pub fn parse_timestamp(text: &str, unit: TimeUnit) -> Option<i64> {
    let text = text.trim();
    let instant = match DateTime::parse_from_rfc3339(text) {
        Ok(instant) => instant.with_timezone(&Utc),
        Err(_) => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()?
            .and_utc(),
    };
    match unit {
        TimeUnit::Millis => Some(instant.timestamp_millis()),
        TimeUnit::Micros => Some(instant.timestamp_micros()),
        TimeUnit::Nanos => instant.timestamp_nanos_opt(),
    }
}

/// Legacy INT96 timestamp: nanoseconds of the day followed by the Julian day
pub fn int96_from_nanos(nanos: i128) -> Option<Int96> {
    let julian_day = u32::try_from(nanos.div_euclid(NANOS_PER_DAY) + JULIAN_DAY_OF_EPOCH).ok()?;
    let nanos_of_day = nanos.rem_euclid(NANOS_PER_DAY) as u64;
    let mut value = Int96::new();
    value.set_data(nanos_of_day as u32, (nanos_of_day >> 32) as u32, julian_day);
    Some(value)
}

/// INT96 for RFC 3339 text
pub fn parse_int96(text: &str) -> Option<Int96> {
    parse_timestamp(text, TimeUnit::Nanos).and_then(|nanos| int96_from_nanos(nanos as i128))
}
