//! Provider thread structures and their normalized form.
//!
//! Raw Gmail-shaped JSON goes in (`raw`); `body` and `message` turn each raw
//! message into a [`Message`], and `thread` orders them into a [`Thread`].

pub mod body;
pub mod message;
pub mod raw;
pub mod thread;

pub use message::Message;
pub use raw::{RawMessage, RawThread, ThreadPage, ThreadSummary};
pub use thread::{Thread, ThreadsResult};
