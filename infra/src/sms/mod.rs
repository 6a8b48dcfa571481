//! SMS gateway implementations and phone-number helpers.

pub mod mock_sms;

pub use mock_sms::MockSmsGateway;

use once_cell::sync::Lazy;
use regex::Regex;

// E.164: leading +, 8 to 15 digits, no leading zero
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{7,14}$").expect("static regex must compile"));

/// Check a phone number against the E.164 format
pub fn is_valid_phone_number(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Mask a phone number for logging, keeping only the last 4 digits
///
/// Input is normalized to `+` and ASCII digits first, so arbitrary
/// (including multibyte) destination strings are safe to mask.
pub fn mask_phone_number(phone: &str) -> String {
    let normalized: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    if normalized.len() <= 4 {
        return "*".repeat(normalized.len());
    }
    let visible = &normalized[normalized.len() - 4..];
    if let Some(rest) = normalized.strip_prefix('+') {
        format!("+{}{}", "*".repeat(rest.len() - 4), visible)
    } else {
        format!("{}{}", "*".repeat(normalized.len() - 4), visible)
    }
}
