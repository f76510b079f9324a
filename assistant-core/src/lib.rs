//! Core of the assistant bot
//!
//! Contacts and notes stores, field validation, persistence, and the
//! interactive command layer: tokenizer, registry, fuzzy resolver,
//! handlers, multi-step flows and the dispatch session.

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod flows;
pub mod handlers;
pub mod models;
pub mod render;
pub mod session;
pub mod storage;
pub mod validators;

pub use commands::{CommandRegistry, CommandResolver, Resolution, TokenizedInput, resolve, tokenize};
pub use config::AssistantConfig;
pub use console::{Console, ScriptedConsole, StdConsole};
pub use error::{AssistantError, RegistryError, ValidationError};
pub use models::{AddressBook, Contact, Note, Notes};
pub use session::{LoopState, Session};
pub use storage::Storage;
