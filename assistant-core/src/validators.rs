//! Field validators
//!
//! Pure checks for contact and note fields. Each validator returns the
//! normalized value or a [`ValidationError`].

use crate::error::ValidationError;
use chrono::NaiveDate;
use regex_utils::{date, email, phone};

/// Validate a phone number in international format with an optional `+`
pub fn validate_phone(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if !phone::is_valid(value) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(value.to_string())
}

/// Validate an email address against the common `text@text.text` shape
pub fn validate_email(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if !email::is_valid(value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(value.to_string())
}

/// Validate a `DD.MM.YYYY` birthday that is not after `today`
pub fn validate_birthday(value: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let (day, month, year) = date::split(value.trim()).ok_or(ValidationError::InvalidDate)?;
    let birthday = NaiveDate::from_ymd_opt(year, month, day).ok_or(ValidationError::InvalidDate)?;
    check_birthday(birthday, today)
}

/// Reject a birthday later than `today`
pub fn check_birthday(birthday: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if birthday > today {
        return Err(ValidationError::FutureBirthday);
    }
    Ok(birthday)
}

/// Validate a contact name; the result is trimmed and title-cased
pub fn validate_name(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(title_case(value))
}

/// Validate a postal address; the result is trimmed and title-cased
pub fn validate_address(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyAddress);
    }
    Ok(title_case(value))
}

pub fn validate_title(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(value.to_string())
}

pub fn validate_tag(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyTag);
    }
    Ok(value.to_string())
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
///
/// `"john o'neil"` becomes `"John O'Neil"`, `"KYIV, main st"` becomes
/// `"Kyiv, Main St"`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}
