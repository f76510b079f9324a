//! Interactive multi-step flows
//!
//! Commands such as `add` collect several fields in a row. Each of them is a
//! small state machine that consumes one input line per step and commits
//! nothing until it finishes, so a cancelled flow leaves the stores as they
//! were.

pub mod contact;
pub mod note;

pub use contact::ContactFlow;
pub use note::{NoteEdit, NoteEditFlow, NoteFlow};

use crate::console::Console;
use std::io;
use tracing::debug;

/// Typing this at any regular step aborts the flow
pub const CANCEL_SENTINEL: &str = "cancel";

/// Result of feeding one line to a flow
#[derive(Debug, Clone, PartialEq)]
pub enum FlowStep<T> {
    /// Keep going, optionally showing feedback first
    Continue(Option<String>),
    Cancelled(String),
    Finished(T),
}

/// How a driven flow ended
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEnd<T> {
    Finished(T),
    Cancelled(String),
}

pub trait Flow {
    /// Store consulted for uniqueness checks
    type Store;
    type Output;

    /// Prompt for the current step
    fn prompt(&self) -> String;

    fn advance(&mut self, input: &str, store: &Self::Store) -> FlowStep<Self::Output>;

    /// Yes/no steps treat `cancel` as a plain "no"
    fn confirming(&self) -> bool {
        false
    }

    fn cancel_message(&self) -> String {
        "Operation cancelled.".to_string()
    }
}

/// Run a flow to completion against a console
pub fn drive<F: Flow>(
    flow: &mut F,
    store: &F::Store,
    console: &mut dyn Console,
) -> io::Result<FlowEnd<F::Output>> {
    loop {
        let Some(line) = console.read_line(&flow.prompt())? else {
            debug!("Input closed during interactive flow");
            return Ok(FlowEnd::Cancelled(flow.cancel_message()));
        };

        if !flow.confirming() && line.trim().eq_ignore_ascii_case(CANCEL_SENTINEL) {
            debug!("Interactive flow cancelled by operator");
            return Ok(FlowEnd::Cancelled(flow.cancel_message()));
        }

        match flow.advance(&line, store) {
            FlowStep::Continue(Some(feedback)) => console.print(&feedback),
            FlowStep::Continue(None) => {}
            FlowStep::Cancelled(reason) => return Ok(FlowEnd::Cancelled(reason)),
            FlowStep::Finished(output) => return Ok(FlowEnd::Finished(output)),
        }
    }
}
