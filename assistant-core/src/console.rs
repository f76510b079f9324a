//! Line-oriented operator console
//!
//! The session and the interactive flows only talk to the operator through
//! [`Console`], so they run the same against a terminal or a script.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Input and output for one interactive session
pub trait Console {
    /// Show `prompt` and read one line without its terminator.
    /// Returns `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn print(&mut self, text: &str);

    /// Ask a yes/no question; only `y`/`yes` counts as agreement
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self.read_line(question)?.is_some_and(|answer| is_affirmative(&answer)))
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Console over the process stdin and stdout
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn print(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Console replaying canned input and recording everything shown
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    prompts: Vec<String>,
    output: Vec<String>,
    fail_on: Option<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { input: lines.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// Fail every read whose prompt contains `fragment`
    pub fn failing_on(mut self, fragment: impl Into<String>) -> Self {
        self.fail_on = Some(fragment.into());
        self
    }

    /// Lines printed so far
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// All printed lines joined with newlines
    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    /// Input lines not consumed yet
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        if self.fail_on.as_deref().is_some_and(|fragment| prompt.contains(fragment)) {
            return Err(io::Error::other("input device lost"));
        }
        Ok(self.input.pop_front())
    }

    fn print(&mut self, text: &str) {
        self.output.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yep"));
    }

    #[test]
    fn test_scripted_console_replays_and_records() {
        let mut console = ScriptedConsole::new(["first", "y"]);
        assert_eq!(console.read_line("> ").unwrap().as_deref(), Some("first"));
        assert!(console.confirm("sure? ").unwrap());
        assert!(!console.confirm("again? ").unwrap());
        console.print("done");

        assert_eq!(console.prompts(), ["> ", "sure? ", "again? "]);
        assert_eq!(console.transcript(), "done");
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn test_scripted_console_fails_on_matching_prompt() {
        let mut console = ScriptedConsole::new(["ok", "y"]).failing_on("Proceed");
        assert_eq!(console.read_line("> ").unwrap().as_deref(), Some("ok"));

        let err = console.confirm("Proceed anyway? ").unwrap_err();
        assert_eq!(err.to_string(), "input device lost");
        assert_eq!(console.remaining(), 1);
    }
}
