//! Command registry
//!
//! Holds the command table (name, handler, usage, description, group) and
//! the alias table. Registration order is preserved and drives the
//! tie-breaking order used by fuzzy resolution.

use crate::error::{RegistryError, Result};
use crate::handlers::{self, CommandContext, Outcome};
use std::collections::HashMap;
use std::fmt;

/// Function implementing one command
pub type Handler = fn(&mut CommandContext<'_>) -> Result<Outcome>;

/// A registered command with metadata
#[derive(Clone, Copy)]
pub struct CommandSpec {
    /// Canonical name, the registry key
    pub name: &'static str,
    pub handler: Handler,
    /// Usage line shown in help and arity errors
    pub usage: &'static str,
    pub description: &'static str,
    /// Help section
    pub group: &'static str,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("group", &self.group)
            .finish()
    }
}

/// Command and alias tables
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    /// Commands in registration order
    commands: Vec<CommandSpec>,
    /// Command name to position in `commands`
    index: HashMap<&'static str, usize>,
    /// `(alias, canonical)` in registration order
    aliases: Vec<(&'static str, &'static str)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in command and alias
    pub fn builtin() -> std::result::Result<Self, RegistryError> {
        let mut registry = Self::new();
        handlers::register_builtins(&mut registry)?;
        Ok(registry)
    }

    /// Register a command
    pub fn register(&mut self, spec: CommandSpec) -> std::result::Result<(), RegistryError> {
        if self.index.contains_key(spec.name) {
            return Err(RegistryError::DuplicateCommand(spec.name.to_string()));
        }
        if self.canonical(spec.name).is_some() {
            return Err(RegistryError::AliasConflict(spec.name.to_string()));
        }

        self.index.insert(spec.name, self.commands.len());
        self.commands.push(spec);
        Ok(())
    }

    /// Register an alias for an already registered command
    pub fn alias(
        &mut self,
        alias: &'static str,
        target: &'static str,
    ) -> std::result::Result<(), RegistryError> {
        if self.index.contains_key(alias) {
            return Err(RegistryError::AliasConflict(alias.to_string()));
        }
        if self.canonical(alias).is_some() {
            return Err(RegistryError::DuplicateAlias(alias.to_string()));
        }
        if !self.index.contains_key(target) {
            return Err(RegistryError::UnknownTarget {
                alias: alias.to_string(),
                target: target.to_string(),
            });
        }

        self.aliases.push((alias, target));
        Ok(())
    }

    /// Get a command by exact name
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.index.get(name).map(|&idx| &self.commands[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Canonical command an alias points to
    pub fn canonical(&self, alias: &str) -> Option<&'static str> {
        self.aliases.iter().find(|(a, _)| *a == alias).map(|(_, target)| *target)
    }

    /// Commands in registration order
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    /// `(alias, canonical)` pairs in registration order
    pub fn aliases(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.aliases.iter().copied()
    }

    pub fn aliases_for(&self, name: &str) -> Vec<&'static str> {
        self.aliases.iter().filter(|(_, target)| *target == name).map(|(alias, _)| *alias).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut CommandContext<'_>) -> Result<Outcome> {
        Ok(Outcome::Silent)
    }

    fn spec(name: &'static str) -> CommandSpec {
        CommandSpec { name, handler: noop, usage: name, description: "test", group: "Test" }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("hello")).unwrap();
        assert_eq!(registry.get("hello").map(|s| s.name), Some("hello"));
        assert!(registry.get("help").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_command_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("exit")).unwrap();
        assert_eq!(
            registry.register(spec("exit")),
            Err(RegistryError::DuplicateCommand("exit".to_string()))
        );
    }

    #[test]
    fn test_alias_rules() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("exit")).unwrap();
        registry.register(spec("add")).unwrap();

        registry.alias("quit", "exit").unwrap();
        registry.alias("bye", "exit").unwrap();
        assert_eq!(registry.canonical("quit"), Some("exit"));
        assert_eq!(registry.aliases_for("exit"), vec!["quit", "bye"]);

        assert_eq!(registry.alias("add", "exit"), Err(RegistryError::AliasConflict("add".to_string())));
        assert_eq!(registry.alias("quit", "add"), Err(RegistryError::DuplicateAlias("quit".to_string())));
        assert!(matches!(registry.alias("x", "missing"), Err(RegistryError::UnknownTarget { .. })));

        // A command cannot take a name already used as an alias
        assert_eq!(registry.register(spec("bye")), Err(RegistryError::AliasConflict("bye".to_string())));
    }

    #[test]
    fn test_builtin_table() {
        let registry = CommandRegistry::builtin().unwrap();
        for name in ["help", "hello", "exit", "add", "find", "delete-contact", "birthdays", "add-note", "find-tag"] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.canonical("quit"), Some("exit"));
        assert_eq!(registry.canonical("create"), Some("add"));
        assert_eq!(registry.canonical("remove"), Some("delete-contact"));
        assert!(registry.commands().all(|spec| spec.usage.starts_with(spec.name)));
    }
}
