//! Keyfeed core: extraction, normalization and reconciliation rules.
//!
//! Pure decision logic only — no IO. The engine crate owns fetching and
//! persistence and threads page text through here.
mod code;
mod dates;
mod extract;
mod overrides;
mod reconcile;
mod registry;
mod types;

pub use code::{scan_codes, CodeToken};
pub use dates::{normalize_date_phrase, parse_range_endpoint, DateSignal};
pub use extract::{extract_fields, SourceFormat, DEFAULT_REWARD};
pub use overrides::{is_known_permanent, override_for, OverrideEntry};
pub use reconcile::{ReconcileState, CORROBORATION_THRESHOLD};
pub use registry::{sources, Source, TrustTier};
pub use types::{CodeRecord, Feed, FieldOutcome};
