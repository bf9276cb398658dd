//! Utility modules.
//!
//! Provides:
//! - [`format_address`], [`format_size_ko`] - Display helpers for command output
//! - [`format_section_row`], [`section_header`] - `sections` table layout

mod format;

pub use format::{format_address, format_section_row, format_size_ko, printable, section_header};
