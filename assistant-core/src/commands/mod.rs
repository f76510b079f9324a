//! Command parsing and resolution
//!
//! Raw input lines are split by the [`tokenizer`], the command word is
//! matched against the [`registry`] by the [`resolver`], and the session
//! dispatches to the resulting handler.

pub mod registry;
pub mod resolver;
pub mod tokenizer;


pub use registry::{CommandRegistry, CommandSpec, Handler};
pub use resolver::{CommandResolver, DEFAULT_THRESHOLD, Resolution, resolve, similarity};
pub use tokenizer::{TokenizedInput, tokenize};
