//! Invocation context handed to tools.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Who a tool runs for and what "now" is in their time zone.
#[derive(Debug, Clone, Serialize)]
pub struct ToolContext {
    /// User the call is made on behalf of.
    pub user_id: String,
    /// Current time in the user's local offset; relative date filters use
    /// this calendar day.
    pub now: DateTime<FixedOffset>,
}

impl Default for ToolContext {
    fn default() -> Self {
        Self {
            user_id: "default".to_string(),
            now: Utc::now().fixed_offset(),
        }
    }
}

impl ToolContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    /// Pin the clock, e.g. to the user's configured time zone.
    pub fn at(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = now;
        self
    }
}
