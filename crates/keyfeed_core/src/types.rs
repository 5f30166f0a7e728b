use chrono::{DateTime, Utc};
use serde::Serialize;

/// Best-effort fields one strategy extracted for a (source, code) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub reward: String,
    /// `None` means either confirmed never-expires or no signal found;
    /// `has_trusted_signal` disambiguates.
    pub expires_at: Option<DateTime<Utc>>,
    pub has_trusted_signal: bool,
    /// The source explicitly marked the code's event as over. Forces
    /// rejection regardless of the parsed date.
    pub ended: bool,
}

/// One published code.
///
/// Field names and the null-semantics of `expires` are the external
/// contract the static site reads; do not rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRecord {
    pub code: String,
    pub reward: String,
    #[serde(rename = "expires")]
    pub expires_at: Option<DateTime<Utc>>,
    pub source: String,
    pub sites: Vec<String>,
}

/// The complete output artifact. Rebuilt from scratch on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feed {
    #[serde(rename = "updated")]
    pub updated_at: DateTime<Utc>,
    pub codes: Vec<CodeRecord>,
}
