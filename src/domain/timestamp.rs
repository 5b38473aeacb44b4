// src/domain/timestamp.rs

//! Last-modified timestamps.
//!
//! Stored as unix milliseconds, exchanged as RFC 3339 with exactly three
//! fractional digits, so a value read by a client and sent back compares
//! equal to the stored one.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now().timestamp_millis();
    DateTime::from_timestamp_millis(now).unwrap_or_else(Utc::now)
}

/// The timestamp a mutation applied now should carry: wall clock time, but
/// always strictly after `previous`.
pub fn next_after(previous: &DateTime<Utc>) -> DateTime<Utc> {
    let now = now_millis();
    if now > *previous {
        now
    } else {
        *previous + Duration::milliseconds(1)
    }
}

pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format(ts))
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}
