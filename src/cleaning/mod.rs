//! Body cleaning pipeline.
//!
//! Every thread goes through three fixed stages:
//! 1. `QuoteStripper::strip()`: per message
//! 2. Recurring-signature removal: across the whole thread at once, after
//!    quotes are gone so repeated quoted boilerplate can't mask a signature
//! 3. `HtmlToText::convert()`: per message, on whatever text remains

pub mod html;
pub mod quotes;
pub mod signature;

use tracing::debug;

use crate::gmail::{Message, Thread};

pub use html::{HtmlToText, ScraperHtmlToText};
pub use quotes::{QuoteStripper, ReplyQuoteStripper};
pub use signature::SignatureConfig;

/// Runs the cleaning stages over a thread's message bodies in place.
pub struct BodyCleaner {
    quotes: Box<dyn QuoteStripper>,
    html: Box<dyn HtmlToText>,
    signatures: SignatureConfig,
}

impl BodyCleaner {
    /// Cleaner with the default quote stripper and HTML converter.
    pub fn new(signatures: SignatureConfig) -> Self {
        Self {
            quotes: Box::new(ReplyQuoteStripper),
            html: Box::new(ScraperHtmlToText),
            signatures,
        }
    }

    /// Replace the quote-stripping stage.
    pub fn with_quote_stripper(mut self, quotes: impl QuoteStripper + 'static) -> Self {
        self.quotes = Box::new(quotes);
        self
    }

    /// Replace the HTML-to-text stage.
    pub fn with_html_converter(mut self, html: impl HtmlToText + 'static) -> Self {
        self.html = Box::new(html);
        self
    }

    pub fn clean_thread(&self, thread: &mut Thread) {
        self.clean_messages(&mut thread.messages);
    }

    /// Clean a set of messages belonging to one thread.
    pub fn clean_messages(&self, messages: &mut [Message]) {
        for message in messages.iter_mut() {
            message.body = self.quotes.strip(&message.body);
        }

        let mut bodies: Vec<String> = messages
            .iter_mut()
            .map(|m| std::mem::take(&mut m.body))
            .collect();
        let removed = signature::strip_repeating_signatures(&mut bodies, &self.signatures);
        if !removed.is_empty() {
            debug!(count = removed.len(), "Removed recurring signatures");
        }
        for (message, body) in messages.iter_mut().zip(bodies) {
            message.body = body;
        }

        for message in messages.iter_mut() {
            message.body = self.html.convert(&message.body);
        }
    }
}

impl Default for BodyCleaner {
    fn default() -> Self {
        Self::new(SignatureConfig::default())
    }
}
