use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::code::CodeToken;

/// Fixed record for a code whose extracted data is known to be wrong or
/// missing. Bypasses extraction and validation entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    pub reward: &'static str,
    /// `None` means confirmed never-expires.
    pub expires: Option<DateTime<Utc>>,
    pub source: &'static str,
}

static OVERRIDES: LazyLock<HashMap<&'static str, OverrideEntry>> = LazyLock::new(|| {
    HashMap::from([
        (
            "KROWW-FJ96F-WXJTX-T3JJB-9J96W",
            OverrideEntry {
                reward: "10 Golden Keys",
                expires: parse_fixed("2026-10-01T23:59:59Z"),
                source: "https://twitter.com/DuvalMagic",
            },
        ),
        (
            "HXKBT-XJ6FR-WBRKJ-J3TTB-RSBHR",
            OverrideEntry {
                reward: "Community Day Maya head & skin",
                expires: None,
                source: "https://twitter.com/Borderlands",
            },
        ),
    ])
});

// Codes confirmed non-expiring even though no source prints a trustworthy
// expiration signal for them.
static KNOWN_PERMANENT: &[&str] = &[
    "ZFKJ3-TT3BB-JTBJT-T3JJT-JWX9H",
    "Z65B3-JCXX6-5JXW3-3B33J-9SWT6",
];

/// Looks up the hand-maintained override table.
pub fn override_for(code: &CodeToken) -> Option<&'static OverrideEntry> {
    OVERRIDES.get(code.as_str())
}

/// Whether a code is exempt from the trusted-signal requirement.
pub fn is_known_permanent(code: &CodeToken) -> bool {
    KNOWN_PERMANENT.contains(&code.as_str())
}

fn parse_fixed(rfc3339: &str) -> Option<DateTime<Utc>> {
    // Static table data; a bad timestamp here is a programming error.
    Some(
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("override table timestamp")
            .with_timezone(&Utc),
    )
}
