//! Error types for the assistant core
//!
//! Domain failures are strongly typed so the handler boundary can decide
//! which ones become operator-facing messages and which ones are unexpected.

use std::fmt;
use thiserror::Error;

/// A field value failed format validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid phone format: use an optional plus and from 10 to 15 digits.")]
    InvalidPhone,

    #[error("Invalid email format: use text@text.text")]
    InvalidEmail,

    #[error("Invalid date format. Use DD.MM.YYYY")]
    InvalidDate,

    #[error("Birthday cannot be in the future")]
    FutureBirthday,

    #[error("Name cannot be empty.")]
    EmptyName,

    #[error("Address cannot be empty.")]
    EmptyAddress,

    #[error("Title cannot be empty.")]
    EmptyTitle,

    #[error("Tag cannot be empty.")]
    EmptyTag,
}

/// Field kinds that can collide with an existing value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Phone,
    Email,
    Address,
    Title,
    Tag,
}

impl FieldKind {
    /// Lower-case label used inside sentences
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Address => "address",
            Self::Title => "title",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => Ok(()),
        }
    }
}

/// Main error type for command execution
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{field} '{value}' already exists for {owner}.")]
    Duplicate { field: FieldKind, value: String, owner: String },

    #[error("Invalid arguments. Usage: {usage}")]
    Usage { usage: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AssistantError {
    pub fn duplicate(field: FieldKind, value: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::Duplicate { field, value: value.into(), owner: owner.into() }
    }

    pub fn usage(usage: impl Into<String>) -> Self {
        Self::Usage { usage: usage.into() }
    }

    /// Whether the error is an input problem the operator can fix and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Duplicate { .. } | Self::Usage { .. })
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;

/// Registry construction failed because a name would be ambiguous
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Command '{0}' is already registered")]
    DuplicateCommand(String),

    #[error("Alias '{0}' is already registered")]
    DuplicateAlias(String),

    #[error("Name '{0}' is used both as a command and as an alias")]
    AliasConflict(String),

    #[error("Alias '{alias}' points to unknown command '{target}'")]
    UnknownTarget { alias: String, target: String },
}
