use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;

/// Keywords sources use to mark a code as non-expiring.
static PERMANENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:new|unlisted|permanent)\b").expect("permanence pattern"));

/// The long-horizon sentinel date some sources print for codes that are
/// long-term but technically time-boxed. Matched before the year sanity
/// bound, which would otherwise reject it.
static SENTINEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdecember\s+31,?\s+2099\b").expect("sentinel pattern"));

static ADDED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*added\b").expect("added prefix pattern"));

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2})(?:\s*,\s*|\s+)(\d{4})\b")
        .expect("month-day-year pattern")
});

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2})\b").expect("month-day pattern")
});

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{2,4})\b").expect("numeric date pattern")
});

static RANGE_ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([a-z]{3,9})\.?\s+(\d{1,2}),\s*(\d{4})\s+at\s+(\d{1,2}):(\d{2})\s*([ap]m)\s*$")
        .expect("range endpoint pattern")
});

// Parsed years outside this open interval are parser misfires.
const MIN_YEAR: i32 = 2020;
const MAX_YEAR: i32 = 2040;

/// What a recognized expiration phrase means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSignal {
    /// Confirmed non-expiring.
    NeverExpires,
    /// Expires at the given instant.
    Expires(DateTime<Utc>),
}

/// Normalizes a human-readable expiration phrase into an absolute instant
/// or a never-expires marker.
///
/// Returns `None` when the phrase is empty or unparsable; the caller's
/// trusted-signal flag, not this function, distinguishes "no signal" from
/// "confirmed never expires". Instants without an explicit time-of-day are
/// pinned to day's end (23:59:59.999 UTC).
pub fn normalize_date_phrase(phrase: &str, now: DateTime<Utc>) -> Option<DateSignal> {
    let phrase = phrase.trim();
    if phrase.is_empty() {
        return None;
    }
    if PERMANENCE.is_match(phrase) {
        return Some(DateSignal::NeverExpires);
    }
    if SENTINEL.is_match(phrase) {
        let date = NaiveDate::from_ymd_opt(2099, 12, 31)?;
        return Some(DateSignal::Expires(end_of_day(date)));
    }

    let date = find_month_day_year(phrase)
        .or_else(|| find_numeric_date(phrase))
        .or_else(|| {
            // "added <Month Day>" phrases carry no year; assume the run's.
            if ADDED_PREFIX.is_match(phrase) {
                find_month_day(phrase, now.year())
            } else {
                None
            }
        })?;

    if !year_in_bounds(date.year()) {
        return None;
    }
    Some(DateSignal::Expires(end_of_day(date)))
}

/// Parses one endpoint of a strict "Month D, YYYY at H:MMam/pm" range,
/// keeping the parsed time-of-day.
pub fn parse_range_endpoint(text: &str) -> Option<DateTime<Utc>> {
    let caps = RANGE_ENDPOINT.captures(text)?;
    let date = month_day_year_to_date(&caps[1], &caps[2], &caps[3])?;
    if !year_in_bounds(date.year()) {
        return None;
    }
    let hour12: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    let hour = to_24_hour(hour12, caps[6].eq_ignore_ascii_case("pm"))?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(Utc.from_utc_datetime(&date.and_time(time)))
}

fn find_month_day_year(phrase: &str) -> Option<NaiveDate> {
    // Any word can precede digits; keep the first candidate that names a month.
    MONTH_DAY_YEAR
        .captures_iter(phrase)
        .find_map(|caps| month_day_year_to_date(&caps[1], &caps[2], &caps[3]))
}

fn find_month_day(phrase: &str, year: i32) -> Option<NaiveDate> {
    MONTH_DAY
        .captures_iter(phrase)
        .find_map(|caps| month_day_year_to_date(&caps[1], &caps[2], &year.to_string()))
}

fn find_numeric_date(phrase: &str) -> Option<NaiveDate> {
    let caps = NUMERIC_DATE.captures(phrase)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let mut year: i32 = caps[3].parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_day_year_to_date(month: &str, day: &str, year: &str) -> Option<NaiveDate> {
    let assembled = format!("{} {}, {}", expand_month_abbreviation(month), day, year);
    NaiveDate::parse_from_str(&assembled, "%B %d, %Y").ok()
}

/// Sources abbreviate some month names in forms chrono does not accept.
fn expand_month_abbreviation(month: &str) -> &str {
    if month.eq_ignore_ascii_case("sept") {
        "September"
    } else if month.eq_ignore_ascii_case("oct") {
        "October"
    } else if month.eq_ignore_ascii_case("nov") {
        "November"
    } else if month.eq_ignore_ascii_case("dec") {
        "December"
    } else {
        month
    }
}

fn to_24_hour(hour12: u32, pm: bool) -> Option<u32> {
    if hour12 == 0 || hour12 > 12 {
        return None;
    }
    Some(match (hour12, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    })
}

fn year_in_bounds(year: i32) -> bool {
    year > MIN_YEAR && year < MAX_YEAR
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid end-of-day time");
    Utc.from_utc_datetime(&date.and_time(time))
}
