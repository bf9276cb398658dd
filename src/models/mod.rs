//! Data models shared by the shell core and the terminal front end.
//!
//! Contains domain types for:
//! - [`LoadedBinary`], [`Section`], [`Arch`], [`BinaryFormat`] - what the loader hands over
//! - [`OutputLine`] - Terminal output types

mod binary;
mod terminal;

pub use binary::{Arch, BinaryFormat, LoadedBinary, Section};
pub use terminal::OutputLine;
