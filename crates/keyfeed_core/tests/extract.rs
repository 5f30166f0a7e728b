use chrono::{DateTime, TimeZone, Utc};
use keyfeed_core::{extract_fields, CodeToken, SourceFormat, DEFAULT_REWARD};
use pretty_assertions::assert_eq;

fn run_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
}

fn end_of_day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 23, 59, 59).unwrap() + chrono::Duration::milliseconds(999)
}

fn token(raw: &str) -> CodeToken {
    CodeToken::parse(raw).unwrap()
}

#[test]
fn line_window_reads_delimited_reward_and_trigger_date() {
    let code = token("ZFKJ3-TT3BB-JTBJT-T3JJT-JWX9H");
    let text = "Some intro text.\n\
                ZFKJ3-TT3BB-JTBJT-T3JJT-JWX9H = 3 Golden Keys (added September 26, 2026)\n\
                Footer.";
    let fields = extract_fields(SourceFormat::LineWindow, text, &code, run_instant()).unwrap();
    assert_eq!(fields.reward, "3 Golden Keys");
    assert!(fields.has_trusted_signal);
    assert_eq!(fields.expires_at, Some(end_of_day(2026, 9, 26)));
    assert!(!fields.ended);
}

#[test]
fn line_window_prefers_parenthesized_reward_without_trigger_words() {
    let code = token("T3QBB-WS6ST-TXBRK-TTTJT-HCK9R");
    let text = "T3QBB-WS6ST-TXBRK-TTTJT-HCK9R (Bewm Bewm Skin) expires October 3, 2026";
    let fields = extract_fields(SourceFormat::LineWindow, text, &code, run_instant()).unwrap();
    assert_eq!(fields.reward, "Bewm Bewm Skin");
    assert!(fields.has_trusted_signal);
    assert_eq!(fields.expires_at, Some(end_of_day(2026, 10, 3)));
}

#[test]
fn line_window_without_trigger_has_no_signal() {
    let code = token("AAAAA-BBBBB-CCCCC-DDDDD-EEEEE");
    let text = "AAAAA-BBBBB-CCCCC-DDDDD-EEEEE = 1 Golden Key";
    let fields = extract_fields(SourceFormat::LineWindow, text, &code, run_instant()).unwrap();
    assert!(!fields.has_trusted_signal);
    assert_eq!(fields.expires_at, None);
}

#[test]
fn line_window_unparsable_trigger_still_counts_as_signal() {
    let code = token("AAAAA-BBBBB-CCCCC-DDDDD-EEEEE");
    let text = "AAAAA-BBBBB-CCCCC-DDDDD-EEEEE - 1 Golden Key (expires soon)";
    let fields = extract_fields(SourceFormat::LineWindow, text, &code, run_instant()).unwrap();
    assert_eq!(fields.reward, "1 Golden Key");
    assert!(fields.has_trusted_signal);
    assert_eq!(fields.expires_at, None);
}

#[test]
fn proximity_window_picks_the_date_closest_to_the_code() {
    let code = token("AAAAA-BBBBB-CCCCC-DDDDD-EEEEE");
    // The January date is farther from the code than the September one.
    let text = format!(
        "January 1, 2027 {} AAAAA-BBBBB-CCCCC-DDDDD-EEEEE | September 30, 2026",
        "x".repeat(60)
    );
    let fields =
        extract_fields(SourceFormat::ProximityWindow, &text, &code, run_instant()).unwrap();
    assert!(fields.has_trusted_signal);
    assert_eq!(fields.expires_at, Some(end_of_day(2026, 9, 30)));
}

#[test]
fn proximity_window_reads_reward_and_permanence() {
    let code = token("AAAAA-BBBBB-CCCCC-DDDDD-EEEEE");
    let text = "5 Golden Keys | AAAAA-BBBBB-CCCCC-DDDDD-EEEEE | Permanent";
    let fields = extract_fields(SourceFormat::ProximityWindow, text, &code, run_instant()).unwrap();
    assert_eq!(fields.reward, "5 Golden Keys");
    assert!(fields.has_trusted_signal);
    // Permanence keyword: confirmed never-expires.
    assert_eq!(fields.expires_at, None);
}

#[test]
fn proximity_window_defaults_without_patterns() {
    let code = token("AAAAA-BBBBB-CCCCC-DDDDD-EEEEE");
    let text = "some cell | AAAAA-BBBBB-CCCCC-DDDDD-EEEEE | another cell";
    let fields = extract_fields(SourceFormat::ProximityWindow, text, &code, run_instant()).unwrap();
    assert_eq!(fields.reward, DEFAULT_REWARD);
    assert!(!fields.has_trusted_signal);
    assert_eq!(fields.expires_at, None);
}

#[test]
fn strict_range_requires_the_two_endpoint_range() {
    let code = token("AAAAA-BBBBB-CCCCC-DDDDD-EEEEE");
    let text = "AAAAA-BBBBB-CCCCC-DDDDD-EEEEE active until further notice";
    assert_eq!(
        extract_fields(SourceFormat::StrictRange, text, &code, run_instant()),
        None
    );
}

#[test]
fn strict_range_keeps_time_of_day_and_rewards_label() {
    let code = token("AAAAA-BBBBB-CCCCC-DDDDD-EEEEE");
    let text = "Rewards: 5 Golden Keys | AAAAA-BBBBB-CCCCC-DDDDD-EEEEE | \
                JUNE 26, 2026 at 10:00am - JULY 10, 2026 at 11:59pm";
    let fields = extract_fields(SourceFormat::StrictRange, text, &code, run_instant()).unwrap();
    assert_eq!(fields.reward, "5 Golden Keys");
    assert!(fields.has_trusted_signal);
    assert_eq!(
        fields.expires_at,
        Some(Utc.with_ymd_and_hms(2026, 7, 10, 23, 59, 0).unwrap())
    );
    assert!(!fields.ended);
}

#[test]
fn strict_range_ended_marker_forces_rejection_flag() {
    let code = token("AAAAA-BBBBB-CCCCC-DDDDD-EEEEE");
    let text = "AAAAA-BBBBB-CCCCC-DDDDD-EEEEE | \
                June 26, 2026 at 10:00am - July 10, 2026 at 11:59pm (Event ended)";
    let fields = extract_fields(SourceFormat::StrictRange, text, &code, run_instant()).unwrap();
    assert!(fields.ended);
}
