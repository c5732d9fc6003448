//! Field normalizer: heterogeneous timestamp representations to epoch millis.
//!
//! Rules:
//! - null → NaN
//! - number < 1e12 is seconds (× 1000); number ≥ 1e12 is already millis
//! - all-digit text is a number under the same rule, except exactly four digits,
//!   which is a calendar year
//! - decimal text is a number under the same rule
//! - other text is a calendar date (`YYYY-MM-DD`, `YYYY-MM`, RFC 3339,
//!   `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`), midnight UTC when no time
//! - anything unparseable → NaN

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracktable_core::query::Bound;
use tracktable_core::types::Cell;

/// Numbers at or above this are milliseconds; below, seconds.
pub const MILLIS_THRESHOLD: f64 = 1e12;

pub fn to_epoch_millis(raw: Cell<'_>) -> f64 {
    match raw {
        Cell::Null => f64::NAN,
        Cell::Num(n) => number_to_millis(n),
        Cell::Text(s) => text_to_millis(s),
    }
}

/// Normalize a range bound the same way as a cell.
pub fn bound_to_millis(bound: &Bound) -> f64 {
    match bound {
        Bound::Number(n) => number_to_millis(*n),
        Bound::Text(s) => text_to_millis(s),
    }
}

fn number_to_millis(n: f64) -> f64 {
    if !n.is_finite() {
        f64::NAN
    } else if n < MILLIS_THRESHOLD {
        n * 1000.0
    } else {
        n
    }
}

fn text_to_millis(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return f64::NAN;
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        if s.len() == 4 {
            return year_to_millis(s);
        }
        return s.parse::<f64>().map(number_to_millis).unwrap_or(f64::NAN);
    }

    if let Ok(n) = s.parse::<f64>() {
        if n.is_finite() {
            return number_to_millis(n);
        }
    }

    parse_date(s).unwrap_or(f64::NAN)
}

fn year_to_millis(s: &str) -> f64 {
    s.parse::<i32>()
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        .map(date_to_millis)
        .unwrap_or(f64::NAN)
}

fn parse_date(s: &str) -> Option<f64> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date_to_millis(d));
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(date_to_millis(d));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis() as f64);
        }
    }
    None
}

fn date_to_millis(d: NaiveDate) -> f64 {
    d.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
        .unwrap_or(f64::NAN)
}
