//! Timestamp handling shared by the domain models.
//!
//! All timestamps are persisted as fixed-width RFC3339 UTC strings
//! (`2026-08-28T12:00:00.000Z`) so that lexicographic ordering in SQLite
//! matches chronological ordering. Keyset pagination and the date-range
//! filters rely on this.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::errors::{Error, Result};

/// Formats a timestamp for storage.
pub fn to_storage(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a stored timestamp, falling back to the epoch on corrupt data.
pub fn from_storage(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Parses a caller-supplied timestamp. Accepts RFC3339 or a plain
/// `YYYY-MM-DD` date, which is anchored at midnight UTC.
pub fn parse_input(field: &str, value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }
    Err(Error::Validation(format!(
        "{} must be an RFC3339 timestamp or YYYY-MM-DD date",
        field
    )))
}

/// Same as [`parse_input`] but a date-only value covers the whole day,
/// so inclusive end-of-range filters behave as callers expect.
pub fn parse_input_end(field: &str, value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_milli_opt(23, 59, 59, 999) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }
    Err(Error::Validation(format!(
        "{} must be an RFC3339 timestamp or YYYY-MM-DD date",
        field
    )))
}

pub mod timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                serde::de::Error::custom(format!("Invalid timestamp format: {}", s))
            })
    }
}

pub mod optional_timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        date: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value {
            None => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|_| {
                    serde::de::Error::custom(format!("Invalid timestamp format: {}", s))
                }),
        }
    }
}
