//! Core logic of the shell.
//!
//! This module provides:
//! - [`tokenize`] and the [`Shell`] dispatcher
//! - [`CommandRegistry`] and the builtin command table
//! - [`autocomplete`] for tab completion
//! - [`Session`] state, its [`SymbolTable`] and the on-disk [`Database`]
//! - [`Loader`] and [`Disassembler`], the seams to the analysis backends

mod autocomplete;
mod commands;
mod database;
mod disasm;
pub mod error;
mod loader;
pub mod parser;
pub mod session;
mod shell;
mod symbols;

pub use autocomplete::{AutocompleteResult, autocomplete, find_common_prefix};
pub use commands::{
    Command, CommandRegistry, CommandResult, Completer, Context, Executor, ShellAction,
};
pub use database::Database;
pub use disasm::{Disassembler, NoBackend};
pub use error::{LoadError, PersistenceError, ShellError, TokenizeError};
pub use loader::{LoadRequest, Loader, ObjectLoader};
pub use parser::tokenize;
pub use session::{DisplayOptions, RawTarget, Session};
pub use shell::Shell;
pub use symbols::{Redefinition, SymbolTable};
