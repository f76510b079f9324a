//! Validated field values
//!
//! Every value type can only be built through its validator. Deserialization
//! goes through the same validators, so a hand-edited store file is
//! normalized or rejected on load.

use crate::error::ValidationError;
use crate::validators;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_field {
    ($(#[$meta:meta])* $name:ident, $validator:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn parse(value: &str) -> Result<Self, ValidationError> {
                $validator(value).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

string_field!(
    /// Title-cased contact name, also the address book key
    Name,
    validators::validate_name
);
string_field!(Phone, validators::validate_phone);
string_field!(Email, validators::validate_email);
string_field!(
    /// Title-cased postal address
    Address,
    validators::validate_address
);

/// Date of birth, displayed as `DD.MM.YYYY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "NaiveDate", into = "NaiveDate")]
pub struct Birthday(NaiveDate);

impl Birthday {
    pub fn parse_at(value: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        validators::validate_birthday(value, today).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// Stored dates are checked against the local date
impl TryFrom<NaiveDate> for Birthday {
    type Error = ValidationError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        validators::check_birthday(date, Local::now().date_naive()).map(Self)
    }
}

impl From<Birthday> for NaiveDate {
    fn from(value: Birthday) -> Self {
        value.0
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%d.%m.%Y"))
    }
}
