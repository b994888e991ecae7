use once_cell::sync::Lazy;
use regex::Regex;

use crate::validation::ValidationError;

static LOCAL_MOBILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^01[3-9]\d{8}$").unwrap());
static COUNTRY_CODE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1[3-9]\d{8}$").unwrap());

fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(*c, '-' | '(' | ')'))
        .collect()
}

/// Accepts a Bangladeshi mobile number in any of its three surface forms:
/// `01XXXXXXXXX`, `880…` and `+880…`.
pub fn validate_phone(raw: &str) -> Result<(), ValidationError> {
    let cleaned = clean(raw);

    if let Some(suffix) = cleaned.strip_prefix("+880") {
        if COUNTRY_CODE_SUFFIX.is_match(suffix) {
            return Ok(());
        }
        return Err(ValidationError::UnrecognizedPhoneFormat(
            "numbers starting with +880 must be followed by 10 digits, e.g. +8801712345678"
                .to_string(),
        ));
    }

    if let Some(suffix) = cleaned.strip_prefix("880") {
        if COUNTRY_CODE_SUFFIX.is_match(suffix) {
            return Ok(());
        }
        return Err(ValidationError::UnrecognizedPhoneFormat(
            "numbers starting with 880 must be followed by 10 digits, e.g. 8801712345678"
                .to_string(),
        ));
    }

    if cleaned.starts_with("01") {
        if LOCAL_MOBILE.is_match(&cleaned) {
            return Ok(());
        }
        return Err(ValidationError::UnrecognizedPhoneFormat(
            "local numbers must be 11 digits starting with 013-019, e.g. 01712345678".to_string(),
        ));
    }

    Err(ValidationError::UnrecognizedPhoneFormat(
        "enter a valid Bangladeshi mobile number".to_string(),
    ))
}

/// Canonical 11-digit local form, used only for equality comparison.
pub fn normalize_phone(raw: &str) -> String {
    let cleaned = clean(raw);

    if let Some(suffix) = cleaned.strip_prefix("+880") {
        return format!("0{}", suffix);
    }
    if let Some(suffix) = cleaned.strip_prefix("880") {
        return format!("0{}", suffix);
    }
    cleaned
}
