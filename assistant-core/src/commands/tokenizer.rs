//! Tokenizer for command lines
//!
//! Splits on whitespace while keeping quoted spans together, so
//! `add-address john "Main St 5"` yields the address as one argument.

/// A command word and its positional arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedInput {
    /// First token, lower-cased
    pub command: String,
    /// Remaining tokens, case preserved
    pub args: Vec<String>,
}

impl TokenizedInput {
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }
}

/// Tokenize a raw input line.
///
/// Either `"` or `'` opens a quoted span that only the same character
/// closes. An unterminated quote runs to the end of the line.
pub fn tokenize(raw: &str) -> TokenizedInput {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in raw.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(ch),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    let mut tokens = tokens.into_iter();
    match tokens.next() {
        Some(first) => TokenizedInput { command: first.to_lowercase(), args: tokens.collect() },
        None => TokenizedInput::default(),
    }
}
