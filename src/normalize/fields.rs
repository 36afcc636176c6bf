//! Tolerant per-field coercions.
//!
//! Every function takes the raw cell (or `None` when the column is missing)
//! and returns a [`Coerced`] value, so the defaulting policy is explicit and
//! none of these can fail.

use crate::constants::{DEFAULT_QUANTITY, UNKNOWN_PLACEMENT};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Result of coercing one raw cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced<T> {
    /// The input was read as-is
    Parsed(T),
    /// The cell was absent or blank
    Default(T),
    /// The cell had content that could not be used; `raw` is the trimmed input
    Fallback { value: T, raw: String },
}

impl<T> Coerced<T> {
    pub fn value(&self) -> &T {
        match self {
            Coerced::Parsed(value) | Coerced::Default(value) => value,
            Coerced::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Coerced::Parsed(value) | Coerced::Default(value) => value,
            Coerced::Fallback { value, .. } => value,
        }
    }

    /// Trimmed input that was rejected, if any
    pub fn rejected(&self) -> Option<&str> {
        match self {
            Coerced::Fallback { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Trimmed name, or `None` when the row has nothing usable
pub fn parse_name(raw: Option<&str>) -> Option<String> {
    non_blank(raw).map(str::to_string)
}

/// Expiration date from `M/D/YY`, `M/D/YYYY` or a direct date string.
///
/// Two-digit years below `pivot` are placed in the 2000s, the others in the 1900s.
pub fn parse_expiration_date(raw: Option<&str>, pivot: u32) -> Coerced<Option<NaiveDate>> {
    let Some(text) = non_blank(raw) else {
        return Coerced::Default(None);
    };

    let parsed = if text.contains('/') {
        parse_slash_date(text, pivot)
    } else {
        parse_direct_date(text)
    };

    match parsed {
        Some(date) => Coerced::Parsed(Some(date)),
        None => Coerced::Fallback {
            value: None,
            raw: text.to_string(),
        },
    }
}

fn parse_slash_date(text: &str, pivot: u32) -> Option<NaiveDate> {
    // Only the first three parts are read; anything after the year is ignored
    let parts: Vec<&str> = text.split('/').map(str::trim).collect();
    let [month, day, year, ..] = parts.as_slice() else {
        return None;
    };

    let month = short_number(month)?;
    let day = short_number(day)?;
    let year = expand_year(year, pivot)?;

    // Month and day are zero-padded the same way the YYYY-MM-DD form expects
    let iso = format!("{year:04}-{month:02}-{day:02}");
    NaiveDate::parse_from_str(&iso, "%Y-%m-%d").ok()
}

fn short_number(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn expand_year(part: &str, pivot: u32) -> Option<i32> {
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match part.len() {
        2 => {
            let yy: i32 = part.parse().ok()?;
            let century = if (yy as u32) < pivot { 2000 } else { 1900 };
            Some(century + yy)
        }
        4 => part.parse().ok(),
        _ => None,
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y.%m.%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

fn parse_direct_date(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Whole, non-negative quantity; blank or unusable input gives [`DEFAULT_QUANTITY`]
pub fn parse_quantity(raw: Option<&str>) -> Coerced<u32> {
    let Some(text) = non_blank(raw) else {
        return Coerced::Default(DEFAULT_QUANTITY);
    };

    let fallback = || Coerced::Fallback {
        value: DEFAULT_QUANTITY,
        raw: text.to_string(),
    };

    let Some(number) = leading_number(text) else {
        return fallback();
    };
    if !number.is_finite() || number < 0.0 || number.trunc() > u32::MAX as f64 {
        return fallback();
    }

    Coerced::Parsed(number.trunc() as u32)
}

/// Longest numeric prefix of `text`, so free text like "3 cans" still reads as 3
fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

/// Comma-separated keywords, trimmed, empties dropped, order and duplicates kept
pub fn parse_keywords(raw: Option<&str>) -> Coerced<Vec<String>> {
    let Some(text) = non_blank(raw) else {
        return Coerced::Default(Vec::new());
    };

    Coerced::Parsed(
        text.split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Trimmed placement with one pair of enclosing double quotes removed
pub fn parse_placement(raw: Option<&str>) -> Coerced<String> {
    let Some(text) = non_blank(raw) else {
        return Coerced::Default(UNKNOWN_PLACEMENT.to_string());
    };

    let text = text.strip_prefix('"').unwrap_or(text);
    let text = text.strip_suffix('"').unwrap_or(text);
    Coerced::Parsed(text.to_string())
}

/// `true` only for "true" (any case) or "1"
pub fn parse_hidden(raw: Option<&str>) -> Coerced<bool> {
    let Some(text) = non_blank(raw) else {
        return Coerced::Default(false);
    };

    if text.eq_ignore_ascii_case("true") || text == "1" {
        Coerced::Parsed(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Coerced::Parsed(false)
    } else {
        Coerced::Fallback {
            value: false,
            raw: text.to_string(),
        }
    }
}
