//! mail-digest: turns raw mail-provider threads into clean, ordered threads
//! for a downstream reasoning component.

pub mod cleaning;
pub mod config;
pub mod context;
pub mod error;
pub mod gmail;
pub mod search;
pub mod tools;
