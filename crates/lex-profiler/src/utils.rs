//! Shared utilities for the profiler.
//!
//! Helpers for dtype classification and for lenient parsing of numbers and
//! timestamps stored as text.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Integer and float dtypes, the ones profiled as numeric without parsing.
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType holds calendar timestamps (date or datetime).
///
/// `Time` is excluded: a time of day has no place on a timeline.
#[inline]
pub fn is_temporal_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

// =============================================================================
// Text Parsing Utilities
// =============================================================================

/// Currency, percent and grouping characters ignored when reading numbers from text.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Placeholder texts that stand for a missing cell (compared case-insensitively).
pub const ERROR_MARKERS: [&str; 8] = [
    "error", "unknown", "n/a", "na", "null", "missing", "none", "#n/a",
];

/// Datetime layouts accepted for text columns declared temporal.
pub const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts accepted for text columns declared temporal.
pub const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Strip formatting characters so the remainder can be parsed as a float.
///
/// # Example
///
/// ```rust,ignore
/// use lex_profiler::utils::clean_numeric_string;
///
/// assert_eq!(clean_numeric_string("£1,250.00"), "1250.00");
/// assert_eq!(clean_numeric_string(" 12.5% "), "12.5");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !NUMERIC_FORMAT_CHARS.contains(c))
        .collect()
}

/// True for placeholder texts such as `N/A` or `unknown`.
pub fn is_error_marker(s: &str) -> bool {
    let trimmed = s.trim();
    ERROR_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// Check if a text cell should be read as missing rather than as a value.
pub fn is_missing_token(s: &str) -> bool {
    s.trim().is_empty() || is_error_marker(s)
}

/// Read a formatted number such as `£1,250` or `12.5%`.
///
/// Returns `None` when nothing numeric remains after stripping formatting.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Try to parse a string as a naive timestamp.
///
/// Date-only values are placed at midnight.
pub fn parse_timestamp_string(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

// =============================================================================
// Formatting Utilities
// =============================================================================

/// Format a count with thousands separators (`1234567` -> `1,234,567`).
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
