use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::code::CodeToken;
use crate::dates::{self, DateSignal};
use crate::types::FieldOutcome;

/// Reward used when no reward-shaped pattern matches. A documented
/// default, not an error.
pub const DEFAULT_REWARD: &str = "1 Golden Key";

// Characters scanned on each side of a code by the proximity strategy.
const PROXIMITY_RADIUS: usize = 250;

static TRIGGER_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:added|expires?|expired)\b[:\s]*(.{0,60})").expect("trigger pattern")
});

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]{2,80})\)").expect("parenthesized pattern"));

static TRIGGER_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:added|expires?|expired)\b").expect("trigger word"));

static LONG_MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
    )
    .expect("long month pattern")
});

static ABBR_MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept?|Oct|Nov|Dec)\.?\s+\d{1,2},?\s+\d{4}\b")
        .expect("abbreviated month pattern")
});

static NUMERIC_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").expect("numeric date pattern"));

static PERMANENCE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:NEW|Unlisted|Permanent)\b").expect("permanence word pattern")
});

static SENTINEL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bDecember\s+31,?\s+2099\b").expect("sentinel date pattern")
});

static GOLDEN_KEYS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+\s*x?\s*golden\s+keys?\b").expect("golden keys pattern")
});

static COSMETIC_PACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:diamond\s+keys?|vault\s+card\s+keys?|[a-z][a-z' -]{2,24}\s+(?:skin|head|trinket)s?(?:\s+pack)?)\b",
    )
    .expect("cosmetic pack pattern")
});

static STRICT_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([a-z]{3,9}\.?\s+\d{1,2},\s*\d{4}\s+at\s+\d{1,2}:\d{2}\s*[ap]m)\s*[-\u{2013}\u{2014}]\s*([a-z]{3,9}\.?\s+\d{1,2},\s*\d{4}\s+at\s+\d{1,2}:\d{2}\s*[ap]m)",
    )
    .expect("strict range pattern")
});

static ENDED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bended\b").expect("ended marker pattern"));

static REWARDS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\brewards?:\s*([^|()\[\]]{2,80})").expect("rewards label pattern")
});

/// Which heuristic parser a source's markup calls for. A closed set so
/// dispatch is an exhaustive match, not a lookup with a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Code and its metadata share one text line.
    LineWindow,
    /// Table-formatted pages; scan a character window around the code.
    ProximityWindow,
    /// One high-trust source printing an exact two-endpoint date range.
    StrictRange,
}

/// Runs the strategy for `format` against `text` for one located code.
///
/// `None` means the strategy found nothing usable at all (strict range
/// only); the other strategies always produce a best-effort outcome.
pub fn extract_fields(
    format: SourceFormat,
    text: &str,
    code: &CodeToken,
    now: DateTime<Utc>,
) -> Option<FieldOutcome> {
    match format {
        SourceFormat::LineWindow => Some(line_window(text, code, now)),
        SourceFormat::ProximityWindow => Some(proximity_window(text, code, now)),
        SourceFormat::StrictRange => strict_range(text, code),
    }
}

fn no_signal() -> FieldOutcome {
    FieldOutcome {
        reward: DEFAULT_REWARD.to_string(),
        expires_at: None,
        has_trusted_signal: false,
        ended: false,
    }
}

/// Locate the line containing the code; reward from a parenthesized group
/// or an `=`/`-` delimited trailing segment, expiration from a trigger
/// word ("added", "expires") on the same line.
fn line_window(text: &str, code: &CodeToken, now: DateTime<Utc>) -> FieldOutcome {
    let Some(line) = text.lines().find(|l| l.contains(code.as_str())) else {
        return no_signal();
    };

    let reward = parenthesized_reward(line)
        .or_else(|| delimited_reward(line, code))
        .unwrap_or_else(|| DEFAULT_REWARD.to_string());

    let mut has_trusted_signal = false;
    let mut expires_at = None;
    if let Some(caps) = TRIGGER_PHRASE.captures(line) {
        // The phrase counts as a signal even when it fails to parse.
        has_trusted_signal = true;
        if let Some(DateSignal::Expires(at)) = dates::normalize_date_phrase(&caps[0], now) {
            expires_at = Some(at);
        }
    }

    FieldOutcome {
        reward,
        expires_at,
        has_trusted_signal,
        ended: false,
    }
}

fn parenthesized_reward(line: &str) -> Option<String> {
    // Parenthesized date phrases like "(added Sept 29)" are not rewards.
    PARENTHESIZED
        .captures_iter(line)
        .map(|caps| caps[1].trim().to_string())
        .find(|candidate| !TRIGGER_WORD.is_match(candidate))
        .filter(|candidate| !candidate.is_empty())
}

fn delimited_reward(line: &str, code: &CodeToken) -> Option<String> {
    let after = line.split(code.as_str()).nth(1)?;
    let after = after.trim_start();
    let rest = after.strip_prefix('=').or_else(|| after.strip_prefix('-'))?;
    let segment = rest.split(['(', '=']).next().unwrap_or(rest).trim();
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Fixed-size window centered on the code; the date match closest to the
/// code wins, the first reward match wins.
fn proximity_window(text: &str, code: &CodeToken, now: DateTime<Utc>) -> FieldOutcome {
    let Some(pos) = text.find(code.as_str()) else {
        return no_signal();
    };
    let (window, code_mid) = char_window(text, pos, code.as_str().len(), PROXIMITY_RADIUS);

    let date_patterns: [&Regex; 5] = [
        &LONG_MONTH_DATE,
        &ABBR_MONTH_DATE,
        &NUMERIC_DATE,
        &PERMANENCE_WORD,
        &SENTINEL_DATE,
    ];
    let mut best: Option<(usize, &str)> = None;
    for pattern in date_patterns {
        for m in pattern.find_iter(window) {
            let mid = (m.start() + m.end()) / 2;
            let distance = mid.abs_diff(code_mid);
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, m.as_str()));
            }
        }
    }

    let has_trusted_signal = best.is_some();
    let expires_at = best.and_then(|(_, phrase)| match dates::normalize_date_phrase(phrase, now) {
        Some(DateSignal::Expires(at)) => Some(at),
        _ => None,
    });

    let reward = first_reward_match(window).unwrap_or_else(|| DEFAULT_REWARD.to_string());

    FieldOutcome {
        reward,
        expires_at,
        has_trusted_signal,
        ended: false,
    }
}

fn first_reward_match(window: &str) -> Option<String> {
    let golden = GOLDEN_KEYS.find(window);
    let cosmetic = COSMETIC_PACK.find(window);
    match (golden, cosmetic) {
        (Some(g), Some(c)) if c.start() < g.start() => Some(c.as_str().trim().to_string()),
        (Some(g), _) => Some(g.as_str().trim().to_string()),
        (None, Some(c)) => Some(c.as_str().trim().to_string()),
        (None, None) => None,
    }
}

/// The code's line must carry an exact two-endpoint range; anything less
/// discards the finding. The second endpoint is the expiry and keeps its
/// parsed time-of-day.
fn strict_range(text: &str, code: &CodeToken) -> Option<FieldOutcome> {
    let line = text.lines().find(|l| l.contains(code.as_str()))?;
    let caps = STRICT_RANGE.captures(line)?;
    // Unparsable endpoints reject the finding outright.
    let _start = dates::parse_range_endpoint(&caps[1])?;
    let end = dates::parse_range_endpoint(&caps[2])?;

    let reward = REWARDS_LABEL
        .captures(line)
        .map(|c| c[1].trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REWARD.to_string());

    Some(FieldOutcome {
        reward,
        expires_at: Some(end),
        has_trusted_signal: true,
        ended: ENDED_MARKER.is_match(line),
    })
}

/// Byte window around `[start, start + len)` widened to char boundaries,
/// plus the code midpoint's offset within the window.
fn char_window(text: &str, start: usize, len: usize, radius: usize) -> (&str, usize) {
    let mut lo = start.saturating_sub(radius);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (start + len).saturating_add(radius).min(text.len());
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    (&text[lo..hi], start - lo + len / 2)
}
