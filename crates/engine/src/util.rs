//! Internal helpers for record normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! lenient parsing of ledger fields so every source applies the same rules.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::{Money, ParseError};

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Placeholder names the ledger stores for anonymous donors.
const ANONYMOUS_PLACEHOLDERS: [&str; 3] = ["anonim", "anonymous", "hamba allah"];

/// Parse a wire amount into a non-negative [`Money`].
pub(crate) fn parse_amount(value: Option<&Value>) -> Result<Money, ParseError> {
    let money = match value {
        None | Some(Value::Null) => return Err(ParseError::MissingAmount),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(rupiah) => Money::new(rupiah),
            None => match number.as_f64() {
                Some(float) if !number.is_u64() => Money::from_f64(float)?,
                _ => return Err(ParseError::InvalidAmount(number.to_string())),
            },
        },
        Some(Value::String(text)) => text.parse::<Money>()?,
        Some(other) => return Err(ParseError::InvalidAmount(other.to_string())),
    };

    if money.is_negative() {
        return Err(ParseError::NegativeAmount(money.rupiah()));
    }
    if money > Money::MAX_RECORD {
        return Err(ParseError::InvalidAmount(money.rupiah().to_string()));
    }
    Ok(money)
}

/// Parse a ledger timestamp into the wall-clock time it was written in.
///
/// The offset of an RFC 3339 timestamp is kept as written, so the resulting
/// year-month is the one visible in the raw text.
pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::MissingDate);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.naive_local());
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(timestamp);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ParseError::InvalidDate(raw.to_string()))
}

/// Render a wire id as text. Numeric ids are kept as their decimal form.
pub(crate) fn id_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

/// Trim a free-text field, mapping blank text to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Lowercase, compatibility-normalized form used to compare enum labels and
/// placeholder names regardless of case or Unicode composition.
pub(crate) fn folded(value: &str) -> String {
    value
        .trim()
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn is_anonymous_placeholder(name: &str) -> bool {
    let name = folded(name);
    name.is_empty() || ANONYMOUS_PLACEHOLDERS.contains(&name.as_str())
}
