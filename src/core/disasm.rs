//! Disassembly and decompilation backend seam.
//!
//! Instruction decoding lives outside the shell. Commands that need it
//! resolve their address, then hand the request to a [`Disassembler`].

use crate::core::error::ShellError;
use crate::core::session::DisplayOptions;
use crate::models::LoadedBinary;

pub trait Disassembler {
    /// Pseudo-code for the function at `addr`.
    fn decompile(
        &self,
        binary: &LoadedBinary,
        addr: u64,
        display: &DisplayOptions,
    ) -> Result<Vec<String>, ShellError>;

    /// `lines` instructions starting at `addr`.
    fn disassemble(
        &self,
        binary: &LoadedBinary,
        addr: u64,
        lines: usize,
        display: &DisplayOptions,
    ) -> Result<Vec<String>, ShellError>;

    /// Every call instruction found in `section`.
    fn calls_in_section(
        &self,
        binary: &LoadedBinary,
        section: &str,
    ) -> Result<Vec<String>, ShellError>;
}

/// Used when no decoding engine is linked in.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBackend;

const NO_BACKEND: &str = "no disassembler backend available";

impl Disassembler for NoBackend {
    fn decompile(
        &self,
        _binary: &LoadedBinary,
        _addr: u64,
        _display: &DisplayOptions,
    ) -> Result<Vec<String>, ShellError> {
        Err(ShellError::Analysis(NO_BACKEND.to_string()))
    }

    fn disassemble(
        &self,
        _binary: &LoadedBinary,
        _addr: u64,
        _lines: usize,
        _display: &DisplayOptions,
    ) -> Result<Vec<String>, ShellError> {
        Err(ShellError::Analysis(NO_BACKEND.to_string()))
    }

    fn calls_in_section(
        &self,
        _binary: &LoadedBinary,
        _section: &str,
    ) -> Result<Vec<String>, ShellError> {
        Err(ShellError::Analysis(NO_BACKEND.to_string()))
    }
}
