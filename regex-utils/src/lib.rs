//! Regex utilities for the assistant
//! Extracted to a separate crate for compilation optimization

use once_cell::sync::Lazy;
use regex::Regex;

/// Phone number patterns
pub mod phone {
    use super::*;

    /// Optional leading plus followed by 10 to 15 digits
    pub static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\+?\d{10,15}$").expect("Invalid regex pattern")
    });

    /// Check whether the text is a well-formed phone number
    pub fn is_valid(text: &str) -> bool {
        PATTERN.is_match(text)
    }
}

/// Email address patterns
pub mod email {
    use super::*;

    pub static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("Invalid regex pattern")
    });

    /// Check whether the text is a well-formed email address
    pub fn is_valid(text: &str) -> bool {
        PATTERN.is_match(text)
    }
}

/// Calendar date patterns
pub mod date {
    use super::*;

    /// `DD.MM.YYYY` shape, checked before the calendar parse
    pub static DOTTED: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("Invalid regex pattern")
    });

    /// Split a dotted date into `(day, month, year)`
    pub fn split(text: &str) -> Option<(u32, u32, i32)> {
        let caps = DOTTED.captures(text)?;
        let day = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let year = caps.get(3)?.as_str().parse().ok()?;
        Some((day, month, year))
    }
}
