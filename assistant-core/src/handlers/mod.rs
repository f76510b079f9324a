//! Command handlers
//!
//! Every command is a plain function taking a [`CommandContext`]. Lookup
//! misses are answered with a message; validation, duplicate and arity
//! problems come back as errors and [`invoke`] turns them into messages.

mod contacts;
mod general;
mod notes;

use crate::commands::{CommandRegistry, CommandSpec};
use crate::config::AssistantConfig;
use crate::console::Console;
use crate::error::{AssistantError, RegistryError, Result};
use crate::models::{AddressBook, Notes};
use crate::render;
use chrono::NaiveDate;
use tracing::debug;

/// Everything a handler may touch while it runs
pub struct CommandContext<'a> {
    /// Arguments after the command word
    pub args: &'a [String],
    /// Usage line of the running command
    pub usage: &'static str,
    pub book: &'a mut AddressBook,
    pub notes: &'a mut Notes,
    pub console: &'a mut dyn Console,
    pub registry: &'a CommandRegistry,
    pub config: &'a AssistantConfig,
    /// Reference date for birthday checks
    pub today: NaiveDate,
}

impl<'a> CommandContext<'a> {
    /// Exactly `N` arguments, or a usage error
    pub fn expect<const N: usize>(&self) -> Result<[&'a str; N]> {
        if self.args.len() != N {
            return Err(AssistantError::usage(self.usage));
        }
        let args = self.args;
        Ok(std::array::from_fn(|i| args[i].as_str()))
    }

    /// First argument plus all remaining ones joined with spaces
    pub fn first_and_rest(&self) -> Result<(&'a str, String)> {
        let args = self.args;
        match args.split_first() {
            Some((first, rest)) if !rest.is_empty() => Ok((first.as_str(), rest.join(" "))),
            _ => Err(AssistantError::usage(self.usage)),
        }
    }

    /// All arguments joined with spaces, at least one required
    pub fn joined(&self) -> Result<String> {
        if self.args.is_empty() {
            return Err(AssistantError::usage(self.usage));
        }
        Ok(self.args.join(" "))
    }

    /// Ask the operator a yes/no question
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self.console.confirm(&render::warning(question))?)
    }
}

/// What the session should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this and keep prompting
    Message(String),
    Silent,
    /// Leave the loop
    Exit,
}

impl Outcome {
    pub fn error(text: impl AsRef<str>) -> Self {
        Self::Message(render::error(text))
    }

    pub fn warning(text: impl AsRef<str>) -> Self {
        Self::Message(render::warning(text))
    }

    pub fn success(text: impl AsRef<str>) -> Self {
        Self::Message(render::success(text))
    }

    pub fn info(text: impl AsRef<str>) -> Self {
        Self::Message(render::info(text))
    }
}

/// Run a handler, turning recoverable errors into an error message
pub fn invoke(spec: &CommandSpec, ctx: &mut CommandContext<'_>) -> Result<Outcome> {
    match (spec.handler)(ctx) {
        Err(e) if e.is_recoverable() => {
            debug!("Command '{}' rejected input: {}", spec.name, e);
            Ok(Outcome::error(e.to_string()))
        }
        other => other,
    }
}

const UTIL: &str = "Util";
const CONTACTS: &str = "Contacts";
const PHONE: &str = "Contacts - Phone";
const NAME: &str = "Contacts - Name";
const EMAIL: &str = "Contacts - Email";
const BIRTHDAY: &str = "Contacts - Birthday";
const ADDRESS: &str = "Contacts - Address";
const NOTES: &str = "Notes";
const TITLE: &str = "Notes - Title";
const CONTENT: &str = "Notes - Content";
const TAGS: &str = "Notes - Tags";

macro_rules! command {
    ($name:literal, $handler:path, $usage:literal, $description:literal, $group:expr) => {
        CommandSpec {
            name: $name,
            handler: $handler,
            usage: $usage,
            description: $description,
            group: $group,
        }
    };
}

/// Built-in commands in registration order
const BUILTINS: &[CommandSpec] = &[
    command!("help", general::help, "help", "Show this help message.", UTIL),
    command!("hello", general::hello, "hello", "Get a greeting from the bot.", UTIL),
    command!("exit", general::exit, "exit", "Save data and exit the assistant.", UTIL),
    command!("all", contacts::all, "all", "Show all contacts.", CONTACTS),
    command!("add", contacts::add, "add", "Add a new contact step by step.", CONTACTS),
    command!(
        "find",
        contacts::find,
        "find <field> <keyword>",
        "Find contacts by name, phone, email, address or birthday.",
        CONTACTS
    ),
    command!("delete-contact", contacts::delete_contact, "delete-contact <name>", "Delete a contact.", CONTACTS),
    command!("add-phone", contacts::add_phone, "add-phone <name> <phone>", "Add a phone to a contact.", PHONE),
    command!(
        "change-phone",
        contacts::change_phone,
        "change-phone <name> <old_phone> <new_phone>",
        "Replace a contact's phone.",
        PHONE
    ),
    command!(
        "delete-phone",
        contacts::delete_phone,
        "delete-phone <name> <phone>",
        "Delete a phone from a contact.",
        PHONE
    ),
    command!("phone", contacts::show_phones, "phone <name>", "Show a contact's phones.", PHONE),
    command!(
        "change-name",
        contacts::change_name,
        "change-name <old_name> <new_name>",
        "Rename a contact.",
        NAME
    ),
    command!("add-email", contacts::add_email, "add-email <name> <email>", "Add an email to a contact.", EMAIL),
    command!(
        "change-email",
        contacts::change_email,
        "change-email <name> <old_email> <new_email>",
        "Replace a contact's email.",
        EMAIL
    ),
    command!(
        "delete-email",
        contacts::delete_email,
        "delete-email <name> <email>",
        "Delete an email from a contact.",
        EMAIL
    ),
    command!("emails", contacts::show_emails, "emails <name>", "Show a contact's emails.", EMAIL),
    command!(
        "add-birthday",
        contacts::add_birthday,
        "add-birthday <name> <DD.MM.YYYY>",
        "Set a contact's birthday.",
        BIRTHDAY
    ),
    command!(
        "change-birthday",
        contacts::change_birthday,
        "change-birthday <name> <DD.MM.YYYY>",
        "Change a contact's birthday.",
        BIRTHDAY
    ),
    command!(
        "delete-birthday",
        contacts::delete_birthday,
        "delete-birthday <name>",
        "Remove a contact's birthday.",
        BIRTHDAY
    ),
    command!(
        "birthdays",
        contacts::birthdays,
        "birthdays [days]",
        "Show birthdays coming up within the given number of days.",
        BIRTHDAY
    ),
    command!(
        "add-address",
        contacts::add_address,
        "add-address <name> <address...>",
        "Add an address to a contact.",
        ADDRESS
    ),
    command!(
        "change-address",
        contacts::change_address,
        "change-address <name> <old_address> <new_address>",
        "Replace a contact's address.",
        ADDRESS
    ),
    command!(
        "delete-address",
        contacts::delete_address,
        "delete-address <name> <address...>",
        "Delete an address from a contact.",
        ADDRESS
    ),
    command!("addresses", contacts::show_addresses, "addresses <name>", "Show a contact's addresses.", ADDRESS),
    command!("all-note", notes::all, "all-note", "Show all notes.", NOTES),
    command!("add-note", notes::add, "add-note", "Add a new note step by step.", NOTES),
    command!("delete-note", notes::delete, "delete-note <title>", "Delete a note.", NOTES),
    command!(
        "change-title",
        notes::change_title,
        "change-title <old_title> <new_title>",
        "Rename a note.",
        TITLE
    ),
    command!("change-note", notes::change, "change-note", "Edit a note's text and title step by step.", CONTENT),
    command!(
        "find-note",
        notes::find,
        "find-note <keyword>",
        "Find notes by keyword in title, text or tags.",
        CONTENT
    ),
    command!("add-tag", notes::add_tag, "add-tag <title> <tag>", "Add a tag to a note.", TAGS),
    command!("find-tag", notes::find_tag, "find-tag <tag>", "Find notes with a tag.", TAGS),
    command!("edit-tag", notes::edit_tag, "edit-tag <title> <old_tag> <new_tag>", "Rename a note's tag.", TAGS),
    command!("delete-tag", notes::delete_tag, "delete-tag <title> <tag>", "Remove a tag from a note.", TAGS),
];

/// `(alias, canonical)` pairs
const ALIASES: &[(&str, &str)] = &[
    ("quit", "exit"),
    ("bye", "exit"),
    ("close", "exit"),
    ("create", "add"),
    ("remove", "delete-contact"),
];

/// Register every built-in command, then the aliases
pub fn register_builtins(registry: &mut CommandRegistry) -> std::result::Result<(), RegistryError> {
    for spec in BUILTINS {
        registry.register(*spec)?;
    }
    for &(alias, target) in ALIASES {
        registry.alias(alias, target)?;
    }
    debug!("Registered {} commands", registry.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arity_helpers() {
        let registry = CommandRegistry::new();
        let config = AssistantConfig::default();
        let mut book = AddressBook::new();
        let mut notes = Notes::new();
        let mut console = ScriptedConsole::default();
        let args = args(&["john", "Main", "St"]);
        let ctx = CommandContext {
            args: &args,
            usage: "add-address <name> <address...>",
            book: &mut book,
            notes: &mut notes,
            console: &mut console,
            registry: &registry,
            config: &config,
            today: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };

        assert_eq!(ctx.expect::<3>().unwrap(), ["john", "Main", "St"]);
        assert!(matches!(ctx.expect::<2>(), Err(AssistantError::Usage { .. })));
        assert_eq!(ctx.first_and_rest().unwrap(), ("john", "Main St".to_string()));
        assert_eq!(ctx.joined().unwrap(), "john Main St");
    }

    #[test]
    fn test_usage_error_becomes_message() {
        let registry = CommandRegistry::builtin().unwrap();
        let config = AssistantConfig::default();
        let mut book = AddressBook::new();
        let mut notes = Notes::new();
        let mut console = ScriptedConsole::default();
        let args = args(&["bob"]);
        let spec = *registry.get("add-phone").unwrap();
        let mut ctx = CommandContext {
            args: &args,
            usage: spec.usage,
            book: &mut book,
            notes: &mut notes,
            console: &mut console,
            registry: &registry,
            config: &config,
            today: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };

        let Outcome::Message(message) = invoke(&spec, &mut ctx).unwrap() else {
            panic!("expected a message");
        };
        assert!(message.contains("Invalid arguments. Usage: add-phone <name> <phone>"));
    }

    #[test]
    fn test_aliases_point_to_builtins() {
        let names: Vec<_> = BUILTINS.iter().map(|spec| spec.name).collect();
        assert!(ALIASES.iter().all(|(_, target)| names.contains(target)));
    }
}
