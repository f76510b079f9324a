//! Interactive dispatch loop
//!
//! Reads a line, tokenizes it, resolves the command word and runs the
//! handler. Fuzzy matches are confirmed with the operator first. The loop
//! is a small state machine; leaving it always goes through `Terminated`,
//! which saves both stores.

use crate::commands::{CommandRegistry, CommandResolver, Resolution, tokenize};
use crate::config::AssistantConfig;
use crate::console::Console;
use crate::handlers::{self, CommandContext, Outcome};
use crate::models::{AddressBook, Notes};
use crate::render;
use crate::storage::Storage;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::io;
use tracing::{debug, error, info};

/// Dispatch loop states
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Prompting,
    /// Waiting for the operator to accept a fuzzy match
    Confirming { word: String, command: &'static str, args: Vec<String> },
    Executing { command: &'static str, args: Vec<String> },
    Terminated,
}

/// One interactive session over both stores
pub struct Session<C: Console> {
    registry: CommandRegistry,
    resolver: CommandResolver,
    book: AddressBook,
    notes: Notes,
    storage: Storage,
    config: AssistantConfig,
    console: C,
    /// Fixed reference date, otherwise the local date
    today: Option<NaiveDate>,
}

impl<C: Console> Session<C> {
    /// Build the registry and load both stores
    pub fn new(storage: Storage, config: AssistantConfig, console: C) -> Result<Self> {
        let registry = CommandRegistry::builtin()?;
        let book = storage.load_contacts()?;
        let notes = storage.load_notes()?;

        Ok(Self {
            registry,
            resolver: CommandResolver::new(config.fuzzy_threshold),
            book,
            notes,
            storage,
            config,
            console,
            today: None,
        })
    }

    /// Pin the date used for birthday checks
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Run until `exit` or end of input, then save both stores
    pub fn run(&mut self) -> Result<()> {
        self.console.print(&render::greet("Welcome to the assistant bot!"));
        self.console.print(&render::help_table(&self.registry));

        let mut state = LoopState::Prompting;
        while state != LoopState::Terminated {
            state = self.step(state);
        }

        self.save()?;
        self.console.print(&render::success("Good bye! Data saved."));
        Ok(())
    }

    /// Write both stores to disk
    pub fn save(&self) -> Result<()> {
        self.storage.save_contacts(&self.book)?;
        self.storage.save_notes(&self.notes)?;
        info!("Session data saved to {}", self.storage.root().display());
        Ok(())
    }

    /// Advance the loop by one transition
    pub fn step(&mut self, state: LoopState) -> LoopState {
        match state {
            LoopState::Prompting => self.prompt(),
            LoopState::Confirming { word, command, args } => self.confirm(&word, command, args),
            LoopState::Executing { command, args } => self.execute(command, &args),
            LoopState::Terminated => LoopState::Terminated,
        }
    }

    fn prompt(&mut self) -> LoopState {
        let line = match self.console.read_line(&render::input("Enter a command: ")) {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Input closed, ending session");
                return LoopState::Terminated;
            }
            Err(e) => return read_failed(e),
        };

        let input = tokenize(&line);
        if input.is_empty() {
            return LoopState::Prompting;
        }

        match self.resolver.resolve(&input.command, &self.registry) {
            Resolution::Exact(command) => LoopState::Executing { command, args: input.args },
            Resolution::Alias(command) => {
                debug!("'{}' is an alias of '{}'", input.command, command);
                LoopState::Executing { command, args: input.args }
            }
            Resolution::Fuzzy { command, score } => {
                debug!("'{}' looks like '{}' (score {:.2})", input.command, command, score);
                LoopState::Confirming { word: input.command, command, args: input.args }
            }
            Resolution::NoMatch => {
                self.console.print(&render::error(format!(
                    "Unknown command '{}'. Type 'help' to see available commands.",
                    input.command
                )));
                LoopState::Prompting
            }
        }
    }

    fn confirm(&mut self, word: &str, command: &'static str, args: Vec<String>) -> LoopState {
        let question = render::warning(format!(
            "Not sure what '{}' meant. Did you mean '{}'? (Y/N): ",
            word, command
        ));
        match self.console.confirm(&question) {
            Ok(true) => LoopState::Executing { command, args },
            Ok(false) => LoopState::Prompting,
            Err(e) => read_failed(e),
        }
    }

    fn execute(&mut self, command: &'static str, args: &[String]) -> LoopState {
        let Some(spec) = self.registry.get(command).copied() else {
            error!("Resolved command '{}' is not registered", command);
            return LoopState::Prompting;
        };

        let today = self.today();
        let mut ctx = CommandContext {
            args,
            usage: spec.usage,
            book: &mut self.book,
            notes: &mut self.notes,
            console: &mut self.console,
            registry: &self.registry,
            config: &self.config,
            today,
        };

        match handlers::invoke(&spec, &mut ctx) {
            Ok(Outcome::Exit) => LoopState::Terminated,
            Ok(Outcome::Message(message)) => {
                if !message.is_empty() {
                    self.console.print(&message);
                }
                LoopState::Prompting
            }
            Ok(Outcome::Silent) => LoopState::Prompting,
            Err(e) => {
                error!("Command '{}' failed: {}", command, e);
                self.console.print(&render::error(format!("Unexpected error: {}", e)));
                LoopState::Prompting
            }
        }
    }
}

fn read_failed(e: io::Error) -> LoopState {
    error!("Failed to read input: {}", e);
    LoopState::Terminated
}
