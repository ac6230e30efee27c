//! Parsers turning raw OCR text into numbers.
//!
//! OCR output is noisy: thousands separators, stray whitespace, French
//! decimal commas, misread punctuation. Both parsers are pure and
//! deterministic so this noise handling stays testable.

use regex::Regex;
use std::sync::OnceLock;

static NUMBER_PATTERN: OnceLock<Regex> = OnceLock::new();
static PERCENTAGE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn number_pattern() -> &'static Regex {
    NUMBER_PATTERN.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid pattern"))
}

fn percentage_pattern() -> &'static Regex {
    PERCENTAGE_PATTERN.get_or_init(|| Regex::new(r"([+-]?)(\d+(?:\.\d+)?)%?").expect("valid pattern"))
}

/// Strips whitespace, drops everything but digits and `,.+-%`, and
/// normalizes the decimal comma to a period.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-' | '+' | '%'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// Parses an absolute numeric value out of recognized text.
///
/// Extracts the first contiguous numeric run after normalization;
/// `"1 234,5"` parses as `1234.5`. Returns `None` when the text contains no
/// recoverable number.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = normalize(text);
    let matched = number_pattern().find(&cleaned)?;
    let value: f64 = matched.as_str().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parses a signed evolution percentage out of recognized text.
///
/// Recognizes an optional leading sign and trailing `%`: `"+15,1%"` parses
/// as `15.1`, `"-8%"` as `-8.0`. Returns `None` when no percentage is
/// recoverable.
pub fn parse_percentage(text: &str) -> Option<f64> {
    let cleaned = normalize(text);
    let caps = percentage_pattern().captures(&cleaned)?;
    let value: f64 = caps[2].parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let sign = if &caps[1] == "-" { -1.0 } else { 1.0 };
    Some(sign * value)
}
