//! Command resolution with "did you mean" matching
//!
//! A typed command word resolves in three steps: exact command name, exact
//! alias, then the most similar command or alias by normalized Levenshtein
//! similarity. A fuzzy result is only a candidate; the session asks the
//! operator before running it.

use super::registry::CommandRegistry;
use tracing::debug;

/// Similarity a candidate must exceed to be suggested
pub const DEFAULT_THRESHOLD: f64 = 0.45;

/// Outcome of resolving one command word
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The word is a registered command
    Exact(&'static str),
    /// The word is an alias of this canonical command
    Alias(&'static str),
    /// Closest canonical command and its similarity score
    Fuzzy { command: &'static str, score: f64 },
    NoMatch,
}

impl Resolution {
    /// Canonical command to run without asking, if any
    pub fn command(&self) -> Option<&'static str> {
        match self {
            Self::Exact(name) | Self::Alias(name) => Some(*name),
            Self::Fuzzy { .. } | Self::NoMatch => None,
        }
    }
}

/// Resolves command words against a registry
#[derive(Debug, Clone, Copy)]
pub struct CommandResolver {
    threshold: f64,
}

impl Default for CommandResolver {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl CommandResolver {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn resolve(&self, word: &str, registry: &CommandRegistry) -> Resolution {
        if let Some(spec) = registry.get(word) {
            return Resolution::Exact(spec.name);
        }
        if let Some(target) = registry.canonical(word) {
            return Resolution::Alias(target);
        }

        // Commands first, then aliases, each in registration order. Only a
        // strictly better score replaces the current best, so ties keep the
        // earliest candidate.
        let candidates = registry
            .commands()
            .map(|spec| (spec.name, spec.name))
            .chain(registry.aliases());

        let mut best: Option<(&'static str, &'static str, f64)> = None;
        for (key, target) in candidates {
            let score = similarity(word, key);
            if best.is_none_or(|(_, _, top)| score > top) {
                best = Some((key, target, score));
            }
        }

        match best {
            Some((key, target, score)) if score > self.threshold => {
                debug!("Resolved '{}' to '{}' via '{}' (score {:.2})", word, target, key, score);
                Resolution::Fuzzy { command: target, score }
            }
            _ => Resolution::NoMatch,
        }
    }
}

/// Resolve with the default threshold
pub fn resolve(word: &str, registry: &CommandRegistry) -> Resolution {
    CommandResolver::default().resolve(word, registry)
}

/// Normalized Levenshtein similarity in `[0, 1]`, over chars
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Edit distance between two command words.
///
/// Keeps one cost vector per row of `typed`; `diagonal` carries the cell
/// above-left of the one being filled.
fn levenshtein(typed: &str, known: &str) -> usize {
    let known: Vec<char> = known.chars().collect();
    if known.is_empty() {
        return typed.chars().count();
    }
    if typed.is_empty() {
        return known.len();
    }

    let mut costs: Vec<usize> = (0..=known.len()).collect();
    for (row, typed_ch) in typed.chars().enumerate() {
        let mut diagonal = costs[0];
        costs[0] = row + 1;
        for (col, &known_ch) in known.iter().enumerate() {
            let above = costs[col + 1];
            costs[col + 1] = if typed_ch == known_ch {
                diagonal
            } else {
                1 + diagonal.min(above).min(costs[col])
            };
            diagonal = above;
        }
    }

    costs[known.len()]
}
