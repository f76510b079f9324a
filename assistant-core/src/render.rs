//! Terminal presentation: colored messages and tables
//!
//! Every function returns the rendered `String`; printing is left to the
//! session so handlers stay testable.

use crate::commands::CommandRegistry;
use crate::models::{Contact, Note};
use colored::Colorize;
use std::collections::BTreeMap;
use tabled::{Table, Tabled, settings::Style};

/// Force colors off (or back to terminal detection)
pub fn set_color_enabled(enabled: bool) {
    if enabled {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

pub fn error(text: impl AsRef<str>) -> String {
    text.as_ref().red().bold().to_string()
}

pub fn warning(text: impl AsRef<str>) -> String {
    text.as_ref().yellow().bold().to_string()
}

pub fn success(text: impl AsRef<str>) -> String {
    text.as_ref().green().bold().to_string()
}

/// Prompt text
pub fn input(text: impl AsRef<str>) -> String {
    text.as_ref().yellow().to_string()
}

pub fn greet(text: impl AsRef<str>) -> String {
    text.as_ref().cyan().bold().to_string()
}

pub fn info(text: impl AsRef<str>) -> String {
    text.as_ref().blue().to_string()
}

/// Search results and lookups
pub fn search(text: impl AsRef<str>) -> String {
    text.as_ref().cyan().to_string()
}

fn titled(title: &str, mut table: Table) -> String {
    table.with(Style::modern());
    format!("{}\n{}", title.magenta().bold(), table)
}

#[derive(Tabled)]
struct ContactRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phones")]
    phones: String,
    #[tabled(rename = "Emails")]
    emails: String,
    #[tabled(rename = "Birthday")]
    birthday: String,
    #[tabled(rename = "Addresses")]
    addresses: String,
}

/// Display contacts in table format
pub fn contacts_table<'a>(contacts: impl IntoIterator<Item = &'a Contact>, title: &str) -> String {
    let rows = contacts.into_iter().map(|c| ContactRow {
        name: c.name().to_string(),
        phones: c.phones_display(),
        emails: c.emails_display(),
        birthday: c.birthday_display(),
        addresses: c.addresses_display(),
    });
    titled(title, Table::new(rows))
}

#[derive(Tabled)]
struct NoteRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

/// Display notes in table format, content shortened
pub fn notes_table<'a>(notes: impl IntoIterator<Item = &'a Note>, title: &str) -> String {
    let rows = notes.into_iter().map(|n| NoteRow {
        title: n.title().to_string(),
        content: n.content_preview(),
        tags: n.tags_display(),
    });
    titled(title, Table::new(rows))
}

#[derive(Tabled)]
struct HelpRow {
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "Aliases")]
    aliases: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Usage")]
    usage: String,
}

/// Commands grouped by category, groups and commands sorted by name
pub fn help_table(registry: &CommandRegistry) -> String {
    let mut groups: BTreeMap<&str, Vec<_>> = BTreeMap::new();
    for spec in registry.commands() {
        groups.entry(spec.group).or_default().push(spec);
    }

    let mut rows = Vec::new();
    for (group, mut specs) in groups {
        rows.push(HelpRow {
            command: format!("[{}]", group),
            aliases: String::new(),
            description: String::new(),
            usage: String::new(),
        });

        specs.sort_by_key(|spec| spec.name);
        for spec in specs {
            let mut aliases = registry.aliases_for(spec.name);
            aliases.sort_unstable();
            rows.push(HelpRow {
                command: spec.name.to_string(),
                aliases: aliases.join(", "),
                description: spec.description.to_string(),
                usage: spec.usage.to_string(),
            });
        }
    }

    titled("Available Commands", Table::new(rows))
}
