//! Error types for the shell.
//!
//! Provides structured error handling with the single-line messages shown
//! to the operator, categorized by where they are raised:
//!
//! - [`TokenizeError`] - malformed quoting or escaping in an input line
//! - [`PersistenceError`] - database read/write failures
//! - [`LoadError`] - failures reported by the binary loader
//! - [`ShellError`] - everything a command or the dispatcher can report

use std::path::PathBuf;

use thiserror::Error;

/// Tokenizer failures for shell-style input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A quoted section was never closed.
    #[error("no closing quotation ({quote})")]
    UnclosedQuote { quote: char },
    /// A backslash was the last character of the line.
    #[error("no escaped character")]
    DanglingEscape,
}

/// Database persistence failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the database file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The database file exists but is not a valid record.
    #[error("{}: invalid database: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Binary loader failures.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was read but its headers could not be parsed.
    #[error("unable to parse binary: {0}")]
    Parse(String),
    /// The format or machine is not handled by this loader.
    #[error("unsupported binary: {0}")]
    Unsupported(String),
}

/// Errors surfaced to the operator by the dispatcher and command executors.
///
/// Every variant renders as a single line. None of them ends the REPL loop.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0}")]
    Tokenize(#[from] TokenizeError),
    #[error("unknown command")]
    UnknownCommand,
    #[error("{name} takes max {max} args")]
    TooManyArguments { name: String, max: usize },
    /// Completion produced more candidates than the display cap.
    #[error("too many possibilities")]
    TooManyCandidates,
    #[error("load a file before")]
    MissingBinary,
    #[error("{0}")]
    InvalidAddressFormat(String),
    /// Arguments were present but did not match any accepted form.
    #[error("{0}")]
    Usage(String),
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
    #[error("{0}")]
    Persistence(#[from] PersistenceError),
    #[error("{0}")]
    Load(#[from] LoadError),
    /// The disassembler backend refused or failed the request.
    #[error("{0}")]
    Analysis(String),
}

impl ShellError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }
}
