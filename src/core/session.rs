//! Session state shared by every command.
//!
//! One [`Session`] lives for the whole shell run. Load commands reset it and
//! install a new binary; symbol edits mark it dirty until the next save.

use std::path::{Path, PathBuf};

use crate::config::{DATABASE_SUFFIX, DEFAULT_LINES, ENTRY_POINT_KEYWORD};
use crate::core::error::ShellError;
use crate::core::symbols::Redefinition;
use crate::models::{Arch, LoadedBinary, Section};

/// Output toggles, both on by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Annotate addresses with their section name.
    pub print_section: bool,
    pub print_comments: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            print_section: true,
            print_comments: true,
        }
    }
}

/// Architecture tag set by the raw load commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawTarget {
    pub arch: Arch,
    pub big_endian: bool,
}

#[derive(Debug)]
pub struct Session {
    pub binary: Option<LoadedBinary>,
    pub filename: Option<PathBuf>,
    pub raw: Option<RawTarget>,
    pub display: DisplayOptions,
    /// Set by symbol edits, cleared by a successful save.
    pub dirty: bool,
    /// Submitted lines. Appended by the REPL only.
    pub history: Vec<String>,
    /// Line count for dump commands without an explicit count.
    pub default_lines: usize,
    /// Endianness for raw targets whose command does not force one.
    pub default_big_endian: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            binary: None,
            filename: None,
            raw: None,
            display: DisplayOptions::default(),
            dirty: false,
            history: Vec::new(),
            default_lines: DEFAULT_LINES,
            default_big_endian: false,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything tied to the current binary.
    ///
    /// History is left alone: the REPL replaces it when a load restores one.
    pub fn reset(&mut self) {
        self.binary = None;
        self.filename = None;
        self.raw = None;
        self.display = DisplayOptions::default();
        self.dirty = false;
    }

    pub fn binary(&self) -> Result<&LoadedBinary, ShellError> {
        self.binary.as_ref().ok_or(ShellError::MissingBinary)
    }

    pub fn binary_mut(&mut self) -> Result<&mut LoadedBinary, ShellError> {
        self.binary.as_mut().ok_or(ShellError::MissingBinary)
    }

    /// Sections of the loaded binary, empty when nothing is loaded.
    pub fn sections(&self) -> &[Section] {
        self.binary
            .as_ref()
            .map(|b| b.sections.as_slice())
            .unwrap_or(&[])
    }

    /// Where the database of the current file lives.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.filename.as_deref().map(database_path_for)
    }

    /// Define or redefine a symbol from its textual address.
    ///
    /// Nothing changes unless the address parses.
    pub fn define_symbol(&mut self, name: &str, addr: &str) -> Result<Redefinition, ShellError> {
        let addr = parse_address(addr)?;
        let binary = self.binary_mut()?;
        let change = binary.symbols.define(name, addr);
        self.dirty = true;
        Ok(change)
    }

    /// Resolve `SYMBOL`, `0xADDR` or `EP` to an address.
    pub fn resolve_entry(&self, entry: &str) -> Result<u64, ShellError> {
        let binary = self.binary()?;
        if entry == ENTRY_POINT_KEYWORD {
            return Ok(binary.entry);
        }
        if entry.starts_with("0x") {
            return parse_address(entry);
        }
        binary
            .symbols
            .address_of(entry)
            .ok_or_else(|| ShellError::UnknownSymbol(entry.to_string()))
    }
}

/// `<binary path>.db`
pub fn database_path_for(binary: &Path) -> PathBuf {
    let mut path = binary.as_os_str().to_owned();
    path.push(DATABASE_SUFFIX);
    PathBuf::from(path)
}

/// Parse a `0x`-prefixed hexadecimal address.
pub fn parse_address(text: &str) -> Result<u64, ShellError> {
    let Some(digits) = text.strip_prefix("0x") else {
        return Err(ShellError::InvalidAddressFormat(
            "the address should starts with 0x".to_string(),
        ));
    };
    u64::from_str_radix(digits, 16)
        .map_err(|_| ShellError::InvalidAddressFormat(format!("invalid address: {}", text)))
}
