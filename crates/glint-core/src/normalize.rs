use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_KEY;

/// Canonical pattern key derived from a raw expense description.
///
/// Two descriptions that normalize to the same key are treated as the same
/// vendor everywhere: pattern lookups, feedback, embeddings, history. The
/// mapping is deterministic and must stay stable across releases, because
/// persisted patterns are keyed by its output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether this is the sentinel key for content-free descriptions.
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_KEY
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<NormalizedKey> for String {
    fn from(key: NormalizedKey) -> Self {
        key.0
    }
}

/// Collapse a raw transaction description into its canonical key.
///
/// Lowercases, replaces every non-alphabetic character (digits, punctuation,
/// symbols) with a space so adjacent tokens never fuse, then collapses runs
/// of whitespace to single spaces and trims. A description with no alphabetic
/// content maps to the [`UNKNOWN_KEY`] sentinel rather than an empty string.
///
/// `"STARBUCKS #4521"` and `"starbucks 0033"` both produce `"starbucks"`.
pub fn normalize(description: &str) -> NormalizedKey {
    let mut cleaned = String::with_capacity(description.len());
    // Case-fold first, then filter: lowercasing can expand one char into
    // several (e.g. combining marks), and those must face the same filter.
    for c in description.chars().flat_map(char::to_lowercase) {
        if c.is_alphabetic() {
            cleaned.push(c);
        } else {
            cleaned.push(' ');
        }
    }

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        NormalizedKey(UNKNOWN_KEY.to_string())
    } else {
        NormalizedKey(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_store_numbers_and_punctuation() {
        assert_eq!(normalize("STARBUCKS #4521").as_str(), "starbucks");
        assert_eq!(normalize("starbucks 0033").as_str(), "starbucks");
    }

    #[test]
    fn digits_do_not_fuse_adjacent_tokens() {
        assert_eq!(normalize("ACME42CORP").as_str(), "acme corp");
        assert_eq!(normalize("UBER *EATS-2024").as_str(), "uber eats");
    }

    #[test]
    fn collapses_interior_whitespace() {
        assert_eq!(normalize("  Office   Depot \t #99 ").as_str(), "office depot");
    }

    #[test]
    fn content_free_input_maps_to_sentinel() {
        assert_eq!(normalize("").as_str(), UNKNOWN_KEY);
        assert_eq!(normalize("12345 *** !!!").as_str(), UNKNOWN_KEY);
        assert!(normalize("#$%").is_unknown());
    }

    #[test]
    fn unicode_input_is_case_folded() {
        assert_eq!(normalize("CAFÉ MÜLLER 77").as_str(), "café müller");
    }

    #[test]
    fn already_normal_input_is_unchanged() {
        assert_eq!(normalize("starbucks").as_str(), "starbucks");
    }
}
