//! Interactive command shell for a binary-analysis tool.
//!
//! The [`core::Shell`] tokenizes and dispatches command lines against a
//! [`core::Session`]; [`terminal::Repl`] drives it from a line editor.

pub mod config;
pub mod core;
pub mod models;
pub mod terminal;
pub mod utils;
