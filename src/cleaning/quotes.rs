//! Reply-quote stripping: drops the quoted history under a reply.

use std::sync::LazyLock;

use regex::Regex;

/// Removes quoted prior messages from a reply body.
pub trait QuoteStripper: Send + Sync {
    fn strip(&self, body: &str) -> String;
}

/// Line-based stripper used by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyQuoteStripper;

impl QuoteStripper for ReplyQuoteStripper {
    fn strip(&self, body: &str) -> String {
        strip_quoted_text(body)
    }
}

static ORIGINAL_MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^-{2,}\s*(original|forwarded) message\s*-*$").unwrap()
});

static FORWARDED_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Sent|To|Date|Subject|Cc):\s").unwrap());

/// Strip quoted text from an email body.
///
/// Removes:
/// - Lines starting with `>` (quoted reply lines)
/// - Everything from an "On ... wrote:" attribution, also when a client
///   wrapped it onto a second line
/// - Everything from an "-----Original Message-----" separator
/// - Everything from an Outlook-style `From:` header block after a blank line
///
/// Leading and trailing blank lines are trimmed. Pure string parsing.
pub fn strip_quoted_text(body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();
    let mut result = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with('>') {
            continue;
        }

        if is_attribution(trimmed, lines.get(i + 1).copied()) {
            break;
        }

        if ORIGINAL_MESSAGE.is_match(trimmed) {
            break;
        }

        if is_header_block(&lines, i) {
            break;
        }

        result.push(*line);
    }

    while result.last().is_some_and(|l| l.trim().is_empty()) {
        result.pop();
    }
    let leading = result.iter().take_while(|l| l.trim().is_empty()).count();

    result[leading..].join("\n")
}

// "On Mon, Jan 1, 2026 at 10:00 AM Alice <alice@ex.com> wrote:"
// "On 2026-01-01 Alice <\nalice@ex.com> wrote:"
fn is_attribution(trimmed: &str, next: Option<&str>) -> bool {
    if !trimmed.starts_with("On ") {
        return false;
    }
    trimmed.ends_with("wrote:")
        || next.is_some_and(|n| {
            let n = n.trim();
            n.ends_with("wrote:") && !n.starts_with("On ")
        })
}

fn is_header_block(lines: &[&str], i: usize) -> bool {
    if i == 0 || !lines[i - 1].trim().is_empty() || !lines[i].trim_start().starts_with("From: ") {
        return false;
    }
    lines[i + 1..]
        .iter()
        .take(3)
        .any(|l| FORWARDED_HEADER.is_match(l.trim_start()))
}
