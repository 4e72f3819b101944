//! Search query composition.
//!
//! The provider owns the query grammar; this only appends the `after:` and
//! `from:` filters an agent asks for to its free-text keywords.

use std::fmt;

use chrono::{DateTime, Months, NaiveDate, TimeZone};

/// How far back a default search looks.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 24;

/// A thread search query under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadQuery {
    pub keywords: String,
    pub sender: Option<String>,
    pub after: Option<NaiveDate>,
}

impl ThreadQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            ..Default::default()
        }
    }

    /// Restrict to messages from a sender (name, address or domain).
    pub fn from_sender(mut self, sender: impl Into<String>) -> Self {
        let sender = sender.into();
        let sender = sender.trim();
        self.sender = (!sender.is_empty()).then(|| sender.to_string());
        self
    }

    pub fn after(mut self, date: NaiveDate) -> Self {
        self.after = Some(date);
        self
    }

    /// Only threads newer than `months` before `now`, in `now`'s calendar.
    /// Month-end dates clamp (Feb 29 minus a year is Feb 28).
    pub fn within_months<Tz: TimeZone>(self, now: &DateTime<Tz>, months: u32) -> Self {
        let today = now.date_naive();
        let cutoff = today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        self.after(cutoff)
    }

    /// Only threads from the default lookback window.
    pub fn recent<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Self {
        self.within_months(now, DEFAULT_LOOKBACK_MONTHS)
    }
}

impl fmt::Display for ThreadQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        let keywords = self.keywords.trim();
        if !keywords.is_empty() {
            parts.push(keywords.to_string());
        }
        if let Some(after) = self.after {
            parts.push(format!("after:{}", after.format("%Y-%m-%d")));
        }
        if let Some(sender) = &self.sender {
            parts.push(format!("from:{sender}"));
        }
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn keywords_only() {
        assert_eq!(ThreadQuery::new("license plate").to_string(), "license plate");
    }

    #[test]
    fn appends_after_then_from() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let query = ThreadQuery::new("(trip OR itinerary) boston")
            .recent(&now)
            .from_sender("jim@abc.com");
        assert_eq!(
            query.to_string(),
            "(trip OR itinerary) boston after:2023-06-15 from:jim@abc.com"
        );
    }

    #[test]
    fn leap_day_clamps() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 8, 0, 0).unwrap();
        let query = ThreadQuery::new("x").within_months(&now, 12);
        assert_eq!(query.after, NaiveDate::from_ymd_opt(2023, 2, 28));
    }

    #[test]
    fn uses_local_calendar_day() {
        // 2025-01-01 02:00 at +05:00 is still 2024-12-31 in UTC.
        let tz = FixedOffset::east_opt(5 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2025, 1, 1, 2, 0, 0).unwrap();
        let query = ThreadQuery::new("dentist").recent(&now);
        assert_eq!(query.to_string(), "dentist after:2023-01-01");
    }

    #[test]
    fn blank_sender_is_ignored() {
        let query = ThreadQuery::new("receipt").from_sender("  ");
        assert_eq!(query.to_string(), "receipt");
    }

    #[test]
    fn empty_keywords_have_no_leading_space() {
        let query = ThreadQuery::new("").from_sender("amazon.com");
        assert_eq!(query.to_string(), "from:amazon.com");
    }
}
