//! Shell configuration.
//!
//! Centralizes the constants used throughout the shell and the runtime
//! options gathered from the command line.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

// =============================================================================
// Interactive Surface
// =============================================================================

/// Prompt shown by the line editor.
pub const PROMPT: &str = ">> ";

/// Indentation for continuation lines in `help` output.
pub const HELP_TAB: &str = "      ";

/// Maximum number of completion candidates before completion is abandoned.
pub const MAX_COMPLETIONS: usize = 80;

/// Appended to an in-progress line so trailing whitespace yields an empty word.
pub const COMPLETION_SENTINEL: char = '_';

/// Warning printed when end-of-input arrives with unsaved changes.
pub const UNSAVED_WARNING: &str = "the database was modified, run save or exit to force";

// =============================================================================
// Analysis Defaults
// =============================================================================

/// Number of lines printed by dump commands when no count is given.
pub const DEFAULT_LINES: usize = 30;

/// Symbol used by `x` when no entry is given.
pub const DEFAULT_ENTRY_SYMBOL: &str = "main";

/// Keyword accepted in place of an address for the entry point.
pub const ENTRY_POINT_KEYWORD: &str = "EP";

// =============================================================================
// Persistence
// =============================================================================

/// Suffix appended to the binary path to form its database path.
pub const DATABASE_SUFFIX: &str = ".db";

// =============================================================================
// Runtime Options
// =============================================================================

/// Architectures accepted by `--raw`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RawArch {
    X86,
    X64,
    Arm,
    Mips,
    Mips64,
}

impl RawArch {
    /// Name of the shell command loading a blob of this architecture.
    pub fn load_command(self) -> &'static str {
        match self {
            RawArch::X86 => "lrawx86",
            RawArch::X64 => "lrawx64",
            RawArch::Arm => "lrawarm",
            RawArch::Mips => "lrawmips",
            RawArch::Mips64 => "lrawmips64",
        }
    }
}

/// Command-line options for `dsh`.
#[derive(Debug, Clone, Parser)]
#[command(name = "dsh", version, about = "Interactive shell for binary analysis")]
pub struct ShellConfig {
    /// Binary to load at startup.
    pub filename: Option<PathBuf>,

    /// Decompile this entry (SYMBOL, 0xADDR or EP) once the binary is loaded.
    #[arg(short = 'x', long = "entry", value_name = "ENTRY")]
    pub entry: Option<String>,

    /// Treat the startup file as a headerless blob for this architecture.
    #[arg(long, value_enum, value_name = "ARCH")]
    pub raw: Option<RawArch>,

    /// Default endianness for raw ARM/MIPS blobs.
    #[arg(long)]
    pub big_endian: bool,

    /// Default number of lines printed by dump commands.
    #[arg(long, default_value_t = DEFAULT_LINES)]
    pub lines: usize,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            filename: None,
            entry: None,
            raw: None,
            big_endian: false,
            lines: DEFAULT_LINES,
            verbose: false,
        }
    }
}

impl ShellConfig {
    /// Command lines to run before the first prompt: the load of the
    /// startup file, then the decompilation of the requested entry.
    pub fn startup_commands(&self) -> Vec<Vec<String>> {
        let Some(filename) = &self.filename else {
            return Vec::new();
        };
        let load = self.raw.map_or("load", RawArch::load_command);
        let mut commands = vec![vec![
            load.to_string(),
            filename.to_string_lossy().into_owned(),
        ]];
        if let Some(entry) = &self.entry {
            commands.push(vec!["x".to_string(), entry.clone()]);
        }
        commands
    }
}
