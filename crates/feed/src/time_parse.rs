// ABOUTME: Date parsing for RSS pubDate (RFC-822) and Atom published (ISO-8601) values.
// ABOUTME: Tolerates common real-world deviations such as named zones and missing offsets.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, warn};

/// Offsets for zone abbreviations seen in RSS dates, in seconds east of UTC.
/// Ambiguous names resolve to their North American meaning, as RFC-822 does.
const NAMED_ZONES: &[(&str, i32)] = &[
    ("GMT", 0),
    ("UTC", 0),
    ("UT", 0),
    ("Z", 0),
    ("EST", -5 * 3600),
    ("EDT", -4 * 3600),
    ("CST", -6 * 3600),
    ("CDT", -5 * 3600),
    ("MST", -7 * 3600),
    ("MDT", -6 * 3600),
    ("PST", -8 * 3600),
    ("PDT", -7 * 3600),
    ("AKST", -9 * 3600),
    ("AKDT", -8 * 3600),
    ("HST", -10 * 3600),
    ("AST", -4 * 3600),
    ("ADT", -3 * 3600),
    ("WET", 0),
    ("WEST", 3600),
    ("BST", 3600),
    ("CET", 3600),
    ("CEST", 2 * 3600),
    ("EET", 2 * 3600),
    ("EEST", 3 * 3600),
    ("JST", 9 * 3600),
    ("KST", 9 * 3600),
    ("AEST", 10 * 3600),
    ("AEDT", 11 * 3600),
    ("NZST", 12 * 3600),
    ("NZDT", 13 * 3600),
];

/// Parses an RSS `pubDate` style timestamp.
///
/// Accepts strict RFC-2822, single-digit days, missing weekdays, named zones,
/// and falls back to ISO-8601 since some feeds put Atom dates in `pubDate`.
pub fn parse_rfc822_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const WITH_OFFSET: &[&str] = &[
        "%a, %d %b %Y %H:%M:%S %z",
        "%a, %e %b %Y %H:%M:%S %z",
        "%a, %d %b %Y %H:%M %z",
        "%d %b %Y %H:%M:%S %z",
        "%e %b %Y %H:%M:%S %z",
    ];
    for fmt in WITH_OFFSET {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    if let Some(dt) = parse_with_named_zone(s) {
        return Some(dt);
    }

    parse_iso8601_time(s)
}

/// Parses an Atom `published`/`updated` timestamp.
///
/// RFC-3339 first, then offset-less and date-only variants, which are taken
/// as UTC.
pub fn parse_iso8601_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Compact offset: "2006-01-02T15:04:05-0700"
    for fmt in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Parses an episode date with `parse`, substituting the current time when
/// the string is missing or unparsable.
///
/// A missing date is routine and logged at debug; a date that fails to parse
/// is logged as a warning naming the string.
pub(crate) fn published_or_now(
    raw: Option<&str>,
    parse: fn(&str) -> Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    let Some(raw) = raw else {
        debug!("no publication date, using current time");
        return Utc::now();
    };
    parse(raw).unwrap_or_else(|| {
        warn!(date = raw, "unable to parse date, using current time");
        Utc::now()
    })
}

/// chrono's `%Z` cannot parse abbreviations, so strip them and apply the offset by hand.
fn parse_with_named_zone(s: &str) -> Option<DateTime<Utc>> {
    let (base, zone) = s.rsplit_once(' ')?;
    let offset_secs = NAMED_ZONES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(zone))
        .map(|(_, offset)| *offset)?;
    let offset = FixedOffset::east_opt(offset_secs)?;

    const WITHOUT_ZONE: &[&str] = &[
        "%a, %d %b %Y %H:%M:%S",
        "%a, %e %b %Y %H:%M:%S",
        "%a, %d %b %Y %H:%M",
        "%d %b %Y %H:%M:%S",
        "%e %b %Y %H:%M:%S",
    ];
    WITHOUT_ZONE.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(base.trim(), fmt).ok()?;
        let dt = offset.from_local_datetime(&naive).single()?;
        Some(dt.with_timezone(&Utc))
    })
}
