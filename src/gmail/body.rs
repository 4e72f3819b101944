//! Body extraction: walks a message's MIME tree for the best textual part.
//!
//! The tree is only borrowed. A `text/plain` preference falls back to
//! `text/html` when no plain-text leaf exists anywhere below a container.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::warn;

use crate::gmail::raw::MessagePart;

/// Base64url with optional padding; providers are inconsistent about `=`.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Textual MIME types a body can be taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Plain,
    Html,
}

impl TextKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/plain" => Some(Self::Plain),
            "text/html" => Some(Self::Html),
            _ => None,
        }
    }
}

/// A textual leaf found in the tree, data still encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyMatch<'a> {
    pub kind: TextKind,
    pub data: &'a str,
}

/// Locate the best textual part under `part`.
///
/// A textual leaf is returned as-is whatever the preference; the caller one
/// level up decides whether its kind is acceptable. For containers the first
/// child yielding the preferred kind wins, then (for a plain preference) the
/// first child yielding HTML.
pub fn find_body(part: &MessagePart, prefer: TextKind) -> Option<BodyMatch<'_>> {
    if let Some(kind) = TextKind::from_mime(&part.mime_type)
        && let Some(data) = part.data()
    {
        return Some(BodyMatch { kind, data });
    }

    if let Some(found) = first_of_kind(&part.parts, prefer) {
        return Some(found);
    }

    if prefer == TextKind::Plain {
        return first_of_kind(&part.parts, TextKind::Html);
    }

    None
}

fn first_of_kind(parts: &[MessagePart], kind: TextKind) -> Option<BodyMatch<'_>> {
    parts
        .iter()
        .filter_map(|sub| find_body(sub, kind))
        .find(|m| m.kind == kind)
}

/// Extract and decode the body text, `""` when nothing usable exists.
pub fn extract_body(part: &MessagePart, prefer: TextKind) -> String {
    find_body(part, prefer)
        .map(|m| decode_body_data(m.data))
        .unwrap_or_default()
}

/// Decode base64url body data into text, replacing invalid UTF-8.
///
/// Data that is not valid base64 decodes to an empty string.
pub fn decode_body_data(data: &str) -> String {
    match URL_SAFE_LENIENT.decode(data.trim()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!(error = %e, len = data.len(), "Undecodable body data, using empty body");
            String::new()
        }
    }
}
