// src/domain/logic.rs

//! Numeric readings of the raw portal text.
//!
//! Portals format money and sizes freely ("1'450.-", "CHF 1 200", "2,5").
//! These helpers never fail loudly: an unreadable value is `None` and each
//! stage decides what `None` means for it.

/// Keeps every ASCII digit and parses the result ("1'450.-" -> 1450).
///
/// Decimal separators are stripped too, so "1450.50" reads as 145050.
pub fn digits_value(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Monthly rent in CHF.
pub fn parse_rent(raw: &str) -> Option<u64> {
    digits_value(raw)
}

/// Living area in m².
pub fn parse_area(raw: &str) -> Option<u64> {
    digits_value(raw)
}

/// Room count; accepts a decimal comma ("2,5").
pub fn parse_rooms(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
