//! Shell-style line splitting.
//!
//! The same tokenizer serves command execution and tab completion:
//! - [`tokenize`] splits a submitted line into words
//! - [`split_partial`] splits an in-progress line and reports the word
//!   under the cursor, empty when the line ends in whitespace

mod lexer;

pub use lexer::Lexer;

use crate::config::COMPLETION_SENTINEL;
use crate::core::error::TokenizeError;

/// Split a line into shell words.
pub fn tokenize(input: &str) -> Result<Vec<String>, TokenizeError> {
    Lexer::new(input).tokenize()
}

/// An in-progress line split for completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialLine {
    /// All words, the last one being the word under completion.
    pub tokens: Vec<String>,
}

impl PartialLine {
    /// The word being completed (possibly empty).
    pub fn last(&self) -> &str {
        self.tokens.last().map(String::as_str).unwrap_or("")
    }

    /// Zero-based index of the argument under completion, `None` while the
    /// command name itself is being typed.
    pub fn arg_index(&self) -> Option<usize> {
        self.tokens.len().checked_sub(2)
    }

    pub fn command(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or("")
    }
}

/// Split an in-progress line.
///
/// A sentinel character is appended before tokenizing so that trailing
/// whitespace still produces an empty last word ("about to type a new
/// argument"); the sentinel is then stripped from that word.
pub fn split_partial(line: &str) -> Result<PartialLine, TokenizeError> {
    let mut padded = String::with_capacity(line.len() + 1);
    padded.push_str(line);
    padded.push(COMPLETION_SENTINEL);

    let mut tokens = tokenize(&padded)?;
    if let Some(last) = tokens.last_mut() {
        last.pop();
    }
    Ok(PartialLine { tokens })
}
