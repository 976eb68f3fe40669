// Datetime and numeric coercion helpers.
//
// This module centralizes the "dirty" string handling so the calculator and
// aggregator can assume clean, typed values. Anything unparseable becomes
// missing; nothing here returns an error.
use chrono::{NaiveDate, NaiveDateTime};

// Source timestamps are day-first with an embedded time of day. Exports with
// ISO dates show up occasionally, so those are accepted as a fallback.
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d/%m/%y", "%Y-%m-%d"];

/// Parse a day-first datetime string. A date without a time of day parses to
/// midnight. Returns `None` for anything else, including `None` input.
pub fn parse_datetime(raw: Option<&str>) -> Option<NaiveDateTime> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// First-login variant of [`parse_datetime`]: the source writes the literal
/// `"0"` (and sometimes nothing) for teams that never logged in, which must
/// read as missing rather than be fed to the parser.
pub fn parse_login_datetime(raw: Option<&str>) -> Option<NaiveDateTime> {
    let s = raw?.trim();
    if s.is_empty() || s == "0" {
        return None;
    }
    parse_datetime(Some(s))
}

/// Signed difference `later - earlier` in minutes; missing if either side is.
pub fn diff_minutes(later: Option<NaiveDateTime>, earlier: Option<NaiveDateTime>) -> Option<f64> {
    let (a, b) = (later?, earlier?);
    Some(a.signed_duration_since(b).num_seconds() as f64 / 60.0)
}

/// Parse a minutes figure that may use a decimal comma ("15,5" → 15.5).
pub fn parse_minutes(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".").parse::<f64>().ok()
}

/// Round to 2 decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Fixed two-decimal rendering used for every calculated cell.
pub fn fmt2(v: f64) -> String {
    format!("{:.2}", v)
}
