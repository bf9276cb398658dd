//! Interactive front end.
//!
//! - [`Repl`] drives the [`Shell`](crate::core::Shell) from a [`LineReader`]
//! - [`RustylineReader`] is the line editor used by the `dsh` binary

mod input;
mod repl;

pub use input::{LineReader, ReadOutcome, RustylineReader, ShellHelper};
pub use repl::{Repl, ReplState};
