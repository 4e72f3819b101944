//! Normalized message records.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::gmail::body::{TextKind, extract_body};
use crate::gmail::raw::RawMessage;

/// One message of a thread, as handed to the downstream consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// RFC 3339 timestamp, or empty when the source date is missing or unparsable.
    pub date: String,
    pub sender: String,
    pub recipient: String,
    pub body: String,
}

impl Message {
    /// Build a message from a raw provider message. Never fails: anything
    /// missing becomes an empty string.
    pub fn from_raw(raw: &RawMessage) -> Self {
        let body = raw
            .payload
            .as_ref()
            .map(|p| extract_body(p, TextKind::Plain))
            .unwrap_or_default();

        Self {
            date: normalize_date(raw.header("Date")),
            sender: raw.header("From").to_string(),
            recipient: raw.header("To").to_string(),
            body,
        }
    }
}

/// Parse an RFC 2822 `Date` header into RFC 3339, keeping the original offset.
///
/// The weekday name is ignored (mail clients get it wrong often enough).
/// Obsolete forms chrono rejects go through mail-parser's lenient parser.
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let without_weekday = match raw.split_once(',') {
        Some((day, rest)) if day.trim().chars().all(|c| c.is_ascii_alphabetic()) => {
            rest.trim_start()
        }
        _ => raw,
    };

    if let Ok(dt) = DateTime::parse_from_rfc2822(without_weekday) {
        return dt.to_rfc3339();
    }

    match raw
        .contains(|c: char| c.is_ascii_digit())
        .then(|| lenient_parse(raw))
        .flatten()
    {
        Some(dt) => dt.to_rfc3339(),
        None => {
            tracing::debug!(date = raw, "Unparsable Date header");
            String::new()
        }
    }
}

fn lenient_parse(raw: &str) -> Option<DateTime<FixedOffset>> {
    let parsed = mail_parser::DateTime::parse_rfc822(raw)?;
    if !parsed.is_valid() {
        return None;
    }
    let magnitude = i32::from(parsed.tz_hour) * 3600 + i32::from(parsed.tz_minute) * 60;
    let offset = FixedOffset::east_opt(if parsed.tz_before_gmt {
        -magnitude
    } else {
        magnitude
    })?;
    let utc = DateTime::from_timestamp(parsed.to_timestamp(), 0)?;
    Some(utc.with_timezone(&offset))
}
