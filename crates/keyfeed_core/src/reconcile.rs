use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::code::{scan_codes, CodeToken};
use crate::extract::extract_fields;
use crate::overrides::{self, OverrideEntry};
use crate::registry::{Source, TrustTier};
use crate::types::{CodeRecord, FieldOutcome};

/// How many independent corroborating sources must agree before a code
/// they report is published. Fixed policy constant.
pub const CORROBORATION_THRESHOLD: u32 = 2;

// Sites tag for records installed from the override table.
const SPECIAL_TAG: &str = "(Special)";

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEntry {
    record: CodeRecord,
    count: u32,
}

enum Evaluation {
    Accept(CodeRecord),
    /// No usable data. Not held against the code.
    Discard,
    /// The source affirmatively knows the code is over (explicit "ended"
    /// marker, or an expiration in the past).
    RejectExpired,
}

/// Accumulated reconciliation state across all fetched sources.
///
/// Callers must absorb every authoritative source before the first
/// corroborating one: the corroborating-tier skip rules read the
/// completed trusted and rejected sets.
#[derive(Debug, Default)]
pub struct ReconcileState {
    trusted: BTreeMap<CodeToken, CodeRecord>,
    rejected: BTreeSet<CodeToken>,
    pending: BTreeMap<CodeToken, PendingEntry>,
}

impl ReconcileState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one fetched page into the state. Repeated occurrences of a
    /// code on the same page collapse to the first.
    pub fn absorb(&mut self, source: &Source, page_text: &str, now: DateTime<Utc>) {
        for code in dedupe_first_seen(scan_codes(page_text)) {
            match source.tier {
                TrustTier::Authoritative => {
                    self.absorb_authoritative(source, page_text, code, now);
                }
                TrustTier::Corroborating => {
                    self.absorb_corroborating(source, page_text, code, now);
                }
            }
        }
    }

    fn absorb_authoritative(
        &mut self,
        source: &Source,
        page_text: &str,
        code: CodeToken,
        now: DateTime<Utc>,
    ) {
        if let Some(entry) = overrides::override_for(&code) {
            self.install_override(code, entry);
            return;
        }
        match evaluate(source, page_text, &code, now) {
            Evaluation::Accept(record) => match self.trusted.entry(code) {
                // First authoritative source wins on data; later ones only
                // corroborate.
                Entry::Occupied(mut existing) => {
                    push_site(existing.get_mut(), &source.name);
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            },
            Evaluation::Discard => {}
            // An authoritative source's expiry knowledge suppresses the
            // code outright; corroboration cannot resurrect it.
            Evaluation::RejectExpired => {
                self.rejected.insert(code);
            }
        }
    }

    fn absorb_corroborating(
        &mut self,
        source: &Source,
        page_text: &str,
        code: CodeToken,
        now: DateTime<Utc>,
    ) {
        // The authoritative tier is final truth, for acceptance and
        // rejection both.
        if self.trusted.contains_key(&code) || self.rejected.contains(&code) {
            return;
        }
        if let Some(entry) = overrides::override_for(&code) {
            self.install_override(code, entry);
            return;
        }
        match evaluate(source, page_text, &code, now) {
            Evaluation::Accept(record) => match self.pending.entry(code) {
                Entry::Occupied(mut existing) => {
                    let pending = existing.get_mut();
                    pending.count += 1;
                    // First sighting wins on data.
                    push_site(&mut pending.record, &source.name);
                }
                Entry::Vacant(slot) => {
                    slot.insert(PendingEntry { record, count: 1 });
                }
            },
            Evaluation::Discard | Evaluation::RejectExpired => {}
        }
    }

    /// Override data takes precedence over anything extracted, from
    /// either tier.
    fn install_override(&mut self, code: CodeToken, entry: &OverrideEntry) {
        self.pending.remove(&code);
        let record = CodeRecord {
            code: code.to_string(),
            reward: entry.reward.to_string(),
            expires_at: entry.expires,
            source: entry.source.to_string(),
            sites: vec![SPECIAL_TAG.to_string()],
        };
        self.trusted.insert(code, record);
    }

    /// Final assembly: the trusted set, plus pending codes that reached
    /// the corroboration threshold, minus anything expired, sorted by
    /// expiry ascending with never-expires last.
    pub fn into_records(self, now: DateTime<Utc>) -> Vec<CodeRecord> {
        let corroborated = self
            .pending
            .into_values()
            .filter(|pending| pending.count >= CORROBORATION_THRESHOLD)
            .map(|pending| pending.record);
        let mut records: Vec<CodeRecord> = self
            .trusted
            .into_values()
            .chain(corroborated)
            .filter(|record| !is_expired(record.expires_at, now))
            .collect();
        records.sort_by(compare_expiry);
        records
    }
}

fn evaluate(
    source: &Source,
    page_text: &str,
    code: &CodeToken,
    now: DateTime<Utc>,
) -> Evaluation {
    let Some(fields) = extract_fields(source.format, page_text, code, now) else {
        return Evaluation::Discard;
    };
    let FieldOutcome {
        reward,
        expires_at,
        has_trusted_signal,
        ended,
    } = fields;

    if ended {
        return Evaluation::RejectExpired;
    }
    // An ambiguous signal is not good enough, unless the code is on the
    // known-permanent list.
    if !has_trusted_signal && expires_at.is_none() && !overrides::is_known_permanent(code) {
        return Evaluation::Discard;
    }
    if is_expired(expires_at, now) {
        return Evaluation::RejectExpired;
    }

    Evaluation::Accept(CodeRecord {
        code: code.to_string(),
        reward,
        expires_at,
        source: source.url.clone(),
        sites: vec![source.name.clone()],
    })
}

/// Expired iff a non-null expiry is at or before `now`. Never-expires is
/// never expired.
fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(expires_at, Some(at) if at <= now)
}

fn compare_expiry(a: &CodeRecord, b: &CodeRecord) -> Ordering {
    match (a.expires_at, b.expires_at) {
        (Some(left), Some(right)) => left.cmp(&right).then_with(|| a.code.cmp(&b.code)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.code.cmp(&b.code),
    }
}

fn dedupe_first_seen(codes: Vec<CodeToken>) -> Vec<CodeToken> {
    let mut seen = BTreeSet::new();
    codes
        .into_iter()
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

fn push_site(record: &mut CodeRecord, site: &str) {
    if !record.sites.iter().any(|existing| existing == site) {
        record.sites.push(site.to_string());
    }
}
