//! Thread assembly: parse, order, derive the subject, clean.

use serde::{Deserialize, Serialize};

use crate::cleaning::BodyCleaner;
use crate::gmail::message::Message;
use crate::gmail::raw::RawThread;

/// A normalized thread, messages in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub subject: String,
    pub messages: Vec<Message>,
}

impl Thread {
    /// Parse and order the messages of a raw thread without cleaning bodies.
    ///
    /// Messages are stably sorted by their RFC 3339 date string, so undated
    /// messages come first and equal dates keep provider order. The subject
    /// comes from the first raw message as the provider listed it.
    pub fn assemble(raw: &RawThread) -> Self {
        let mut messages: Vec<Message> = raw.messages.iter().map(Message::from_raw).collect();
        messages.sort_by(|a, b| a.date.cmp(&b.date));

        let subject = raw
            .messages
            .first()
            .map(|m| m.header("Subject").to_string())
            .unwrap_or_default();

        Self {
            id: raw.id.clone(),
            subject,
            messages,
        }
    }

    /// Assemble a raw thread and run the cleaning pipeline over it.
    pub fn from_raw(raw: &RawThread, cleaner: &BodyCleaner) -> Self {
        let mut thread = Self::assemble(raw);
        cleaner.clean_thread(&mut thread);
        tracing::debug!(
            thread_id = %thread.id,
            messages = thread.messages.len(),
            "Thread assembled"
        );
        thread
    }
}

/// One page of cleaned threads plus the provider's opaque continuation token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadsResult {
    pub threads: Vec<Thread>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gmail::raw::{Header, MessagePart, RawMessage};
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE;

    fn raw_message(date: Option<&str>, subject: Option<&str>, body: &str) -> RawMessage {
        let mut payload = MessagePart::leaf("text/plain", URL_SAFE.encode(body));
        if let Some(d) = date {
            payload.headers.push(Header {
                name: "Date".into(),
                value: d.into(),
            });
        }
        if let Some(s) = subject {
            payload.headers.push(Header {
                name: "Subject".into(),
                value: s.into(),
            });
        }
        RawMessage {
            payload: Some(payload),
            ..Default::default()
        }
    }

    #[test]
    fn sorts_by_date_and_keeps_first_subject() {
        let raw = RawThread {
            id: "t1".into(),
            messages: vec![
                raw_message(Some("Wed, 3 Jan 2024 10:00:00 +0000"), Some("Re: Plans"), "third"),
                raw_message(Some("Mon, 1 Jan 2024 10:00:00 +0000"), Some("Plans"), "first"),
                raw_message(Some("Tue, 2 Jan 2024 10:00:00 +0000"), None, "second"),
            ],
        };
        let thread = Thread::assemble(&raw);
        assert_eq!(thread.id, "t1");
        assert_eq!(thread.subject, "Re: Plans");
        let bodies: Vec<&str> = thread.messages.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second", "third"]);
    }

    #[test]
    fn undated_messages_sort_first_and_stay_stable() {
        let raw = RawThread {
            id: "t".into(),
            messages: vec![
                raw_message(Some("Mon, 1 Jan 2024 10:00:00 +0000"), None, "dated"),
                raw_message(None, None, "undated-a"),
                raw_message(Some("not a date"), None, "undated-b"),
                raw_message(Some("Mon, 1 Jan 2024 10:00:00 +0000"), None, "dated-again"),
            ],
        };
        let thread = Thread::assemble(&raw);
        let bodies: Vec<&str> = thread.messages.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["undated-a", "undated-b", "dated", "dated-again"]);
        assert!(thread.messages.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn empty_thread_has_empty_subject() {
        let thread = Thread::assemble(&RawThread {
            id: "t".into(),
            messages: vec![],
        });
        assert_eq!(thread.subject, "");
        assert!(thread.messages.is_empty());
    }

    #[test]
    fn missing_subject_header_is_empty() {
        let raw = RawThread {
            id: "t".into(),
            messages: vec![raw_message(None, None, "x"), raw_message(None, Some("Later"), "y")],
        };
        assert_eq!(Thread::assemble(&raw).subject, "");
    }

    #[test]
    fn from_raw_cleans_bodies() {
        let raw = RawThread {
            id: "t".into(),
            messages: vec![raw_message(None, None, "Sounds good\n\n> earlier text")],
        };
        let thread = Thread::from_raw(&raw, &BodyCleaner::default());
        assert_eq!(thread.messages[0].body, "Sounds good");
    }

    #[test]
    fn result_serializes_token() {
        let result = ThreadsResult {
            threads: vec![],
            next_page_token: Some("opaque-123".into()),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["next_page_token"], "opaque-123");
    }
}
