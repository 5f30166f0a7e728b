use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// Five groups of five uppercase-alphanumeric characters, hyphen-joined.
static CODE_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9A-Z]{5}(?:-[0-9A-Z]{5}){4}\b").expect("code scan pattern")
});
static CODE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Z]{5}(?:-[0-9A-Z]{5}){4}$").expect("code shape pattern")
});

/// A redemption code in the fixed 5x5 hyphen-grouped shape.
///
/// Stored uppercase so lookups against the hand-maintained override and
/// known-permanent tables never miss on case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodeToken(String);

impl CodeToken {
    /// Validates a raw string against the code shape, normalizing case.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        if CODE_SHAPE.is_match(&normalized) {
            Some(Self(normalized))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every code-shaped match in `text`, in order of appearance.
///
/// Repeats are returned as-is; collapsing duplicates is the
/// reconciliation layer's job, not the scanner's.
pub fn scan_codes(text: &str) -> Vec<CodeToken> {
    CODE_SCAN
        .find_iter(text)
        .filter_map(|m| CodeToken::parse(m.as_str()))
        .collect()
}
