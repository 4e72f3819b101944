//! Recurring signature detection.
//!
//! A signature is a block of trailing lines shared verbatim by several
//! messages of the same thread. Matching is exact string equality, so two
//! sign-offs that differ by a single space are unrelated.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

/// Thresholds for signature detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureConfig {
    /// Minimum number of trailing lines a block needs to count.
    pub min_signature_lines: usize,
    /// Minimum number of distinct messages that must end with the block.
    pub min_messages_with_signature: usize,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            min_signature_lines: 3,
            min_messages_with_signature: 2,
        }
    }
}

/// A trailing block and the messages it ends.
#[derive(Debug)]
struct SignatureCandidate<'a> {
    text: &'a str,
    message_indices: BTreeSet<usize>,
}

/// Find the maximal trailing blocks shared by enough messages.
///
/// The result is a suffix antichain ordered longest first: once a block is
/// accepted, none of its own trailing sub-blocks are.
pub fn find_repeating_signatures<S: AsRef<str>>(
    bodies: &[S],
    config: &SignatureConfig,
) -> Vec<String> {
    if bodies.len() < config.min_messages_with_signature {
        return Vec::new();
    }

    let min_lines = config.min_signature_lines.max(1);
    let mut suffixes: HashMap<&str, BTreeSet<usize>> = HashMap::new();
    for (idx, body) in bodies.iter().enumerate() {
        let body = body.as_ref();
        let starts = line_starts(body);
        if starts.len() < min_lines {
            continue;
        }
        // starts[i] is the byte offset of line i; the last n lines begin at starts[len - n].
        for &start in &starts[..=starts.len() - min_lines] {
            suffixes.entry(&body[start..]).or_default().insert(idx);
        }
    }

    let mut candidates: Vec<SignatureCandidate<'_>> = suffixes
        .into_iter()
        .filter(|(_, idxs)| idxs.len() >= config.min_messages_with_signature)
        .map(|(text, message_indices)| SignatureCandidate {
            text,
            message_indices,
        })
        .collect();
    candidates.sort_by(|a, b| b.text.len().cmp(&a.text.len()).then(a.text.cmp(b.text)));

    let mut accepted: Vec<&str> = Vec::new();
    for candidate in &candidates {
        if accepted.iter().any(|sig| sig.ends_with(candidate.text)) {
            continue;
        }
        debug!(
            lines = line_starts(candidate.text).len(),
            messages = candidate.message_indices.len(),
            "Accepted recurring signature"
        );
        accepted.push(candidate.text);
    }

    accepted.into_iter().map(str::to_string).collect()
}

/// Remove the first literal occurrence of each signature from every body.
pub fn remove_signatures(bodies: &mut [String], signatures: &[String]) {
    for signature in signatures.iter().filter(|s| !s.is_empty()) {
        for body in bodies.iter_mut() {
            if let Some(pos) = body.find(signature.as_str()) {
                body.replace_range(pos..pos + signature.len(), "");
            }
        }
    }
}

/// Detect and strip recurring signatures in one pass. Returns what was removed.
pub fn strip_repeating_signatures(bodies: &mut [String], config: &SignatureConfig) -> Vec<String> {
    let signatures = find_repeating_signatures(bodies, config);
    remove_signatures(bodies, &signatures);
    signatures
}

/// Byte offsets at which each line begins. Lines end after `\n`, `\r\n`
/// or a lone `\r`, and keep their terminator.
fn line_starts(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut starts = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let end = match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => Some(i + 2),
            b'\r' | b'\n' => Some(i + 1),
            _ => None,
        };
        match end {
            Some(end) => {
                starts.push(start);
                start = end;
                i = end;
            }
            None => i += 1,
        }
    }
    if start < bytes.len() {
        starts.push(start);
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn two_line_config() -> SignatureConfig {
        SignatureConfig {
            min_signature_lines: 2,
            min_messages_with_signature: 2,
        }
    }

    #[test]
    fn strips_shared_sign_off() {
        let mut b = bodies(&["Hi\nThanks,\nBob\n", "Ok\nThanks,\nBob\n", "Sure\nThanks,\nBob\n"]);
        let removed = strip_repeating_signatures(&mut b, &two_line_config());
        assert_eq!(removed, vec!["Thanks,\nBob\n".to_string()]);
        assert_eq!(b, bodies(&["Hi\n", "Ok\n", "Sure\n"]));
    }

    #[test]
    fn one_message_below_threshold_is_untouched() {
        let config = SignatureConfig {
            min_signature_lines: 2,
            min_messages_with_signature: 3,
        };
        let mut b = bodies(&["Hi\nThanks,\nBob\n", "Ok\nThanks,\nBob\n", "Unrelated\n"]);
        let before = b.clone();
        assert!(strip_repeating_signatures(&mut b, &config).is_empty());
        assert_eq!(b, before);
    }

    #[test]
    fn exactly_threshold_messages_are_stripped() {
        let config = SignatureConfig {
            min_signature_lines: 2,
            min_messages_with_signature: 3,
        };
        let mut b = bodies(&["A\n--\nJo\n", "B\n--\nJo\n", "C\n--\nJo\n"]);
        strip_repeating_signatures(&mut b, &config);
        assert_eq!(b, bodies(&["A\n", "B\n", "C\n"]));
    }

    #[test]
    fn too_few_messages_does_nothing() {
        let b = bodies(&["x\ny\nz\n"]);
        assert!(find_repeating_signatures(&b, &SignatureConfig::default()).is_empty());
    }

    #[test]
    fn short_blocks_do_not_qualify() {
        let b = bodies(&["Hi\nBob\n", "Ok\nBob\n"]);
        assert!(find_repeating_signatures(&b, &SignatureConfig::default()).is_empty());
    }

    #[test]
    fn empty_bodies_contribute_nothing() {
        let b = bodies(&["", "", ""]);
        assert!(find_repeating_signatures(&b, &two_line_config()).is_empty());
    }

    #[test]
    fn keeps_longest_and_drops_its_suffixes() {
        let b = bodies(&[
            "one\nBest,\nBob\nAcme Inc\n",
            "two\nBest,\nBob\nAcme Inc\n",
        ]);
        let sigs = find_repeating_signatures(&b, &two_line_config());
        assert_eq!(sigs, vec!["Best,\nBob\nAcme Inc\n".to_string()]);
    }

    #[test]
    fn accepted_set_is_suffix_antichain() {
        let b = bodies(&[
            "a\nx\ny\nz\n",
            "b\nx\ny\nz\n",
            "c\nq\ny\nz\n",
            "d\nq\ny\nz\n",
        ]);
        let sigs = find_repeating_signatures(&b, &two_line_config());
        assert_eq!(sigs, vec!["q\ny\nz\n".to_string(), "x\ny\nz\n".to_string()]);
        for (i, a) in sigs.iter().enumerate() {
            for (j, other) in sigs.iter().enumerate() {
                if i != j {
                    assert!(!a.ends_with(other.as_str()));
                }
            }
        }
    }

    #[test]
    fn result_does_not_depend_on_message_order() {
        let forward = bodies(&["a\nx\ny\nz\n", "b\nx\ny\nz\n", "c\nq\ny\nz\n", "d\nq\ny\nz\n"]);
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(
            find_repeating_signatures(&forward, &two_line_config()),
            find_repeating_signatures(&reversed, &two_line_config())
        );
    }

    #[test]
    fn whitespace_difference_breaks_match() {
        let b = bodies(&["a\nThanks,\nBob\n", "b\nThanks, \nBob\n"]);
        let sigs = find_repeating_signatures(&b, &two_line_config());
        assert!(sigs.is_empty());
    }

    #[test]
    fn removes_only_first_occurrence() {
        let mut b = bodies(&["sig\nsig\n", "other"]);
        remove_signatures(&mut b, &["sig\n".to_string()]);
        assert_eq!(b[0], "sig\n");
        assert_eq!(b[1], "other");
    }

    #[test]
    fn crlf_lines_keep_terminators() {
        assert_eq!(line_starts("a\r\nb\rc\nd"), vec![0, 3, 5, 7]);
        assert_eq!(line_starts(""), Vec::<usize>::new());
        assert_eq!(line_starts("a\n"), vec![0]);
    }

    #[test]
    fn unterminated_last_line_matches_only_unterminated() {
        let b = bodies(&["Hi\nThanks,\nBob", "Ok\nThanks,\nBob\n"]);
        assert!(find_repeating_signatures(&b, &two_line_config()).is_empty());
    }

    #[test]
    fn removal_can_expose_a_new_shared_block() {
        let config = SignatureConfig::default();
        let mut b = bodies(&["x\ny\nz\n1\n2\n3\n", "w\n1\n2\n3\n", "q\nx\ny\nz\n"]);

        let first = strip_repeating_signatures(&mut b, &config);
        assert_eq!(first, vec!["1\n2\n3\n".to_string()]);
        assert_eq!(b, bodies(&["x\ny\nz\n", "w\n", "q\nx\ny\nz\n"]));

        // The first pass left "x y z" trailing two bodies; a second pass takes it.
        let second = strip_repeating_signatures(&mut b, &config);
        assert_eq!(second, vec!["x\ny\nz\n".to_string()]);
        assert_eq!(b, bodies(&["", "w\n", "q\n"]));
    }
}
