use lazy_static::lazy_static;
use regex::Regex;
use serde::{de, Deserialize, Deserializer};

use crate::error::ApiError;

pub(crate) const NULL_FIELD: &str = "This field may not be null.";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// A required text field: not blank and at most `max` characters.
pub(crate) fn require_text(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field}: This field may not be blank.")));
    }
    if value.chars().count() > max {
        return Err(ApiError::validation(format!(
            "{field}: Ensure this field has no more than {max} characters."
        )));
    }
    Ok(())
}

/// `require_text` for a field that may be absent.
pub(crate) fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<(), ApiError> {
    match value {
        Some(v) => require_text(field, v, max),
        None => Ok(()),
    }
}

/// Text field with surrounding whitespace stripped before validation and storage.
pub(crate) fn trimmed<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(d)?.trim().to_owned())
}

/// Patch field that may be omitted but not sent as `null`. Use with `#[serde(default)]`.
pub(crate) fn non_null<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d)?
        .map(Some)
        .ok_or_else(|| de::Error::custom(NULL_FIELD))
}

/// `non_null` for text, trimmed like `trimmed`.
pub(crate) fn non_null_trimmed<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_null::<_, String>(d)?.map(|s| s.trim().to_owned()))
}
