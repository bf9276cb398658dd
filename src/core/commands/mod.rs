//! Command table and registry.
//!
//! This module provides:
//! - [`Command`], an immutable entry of the command table
//! - [`CommandRegistry`], the name-keyed table plus its display order
//! - [`Context`], the state handed to every executor
//!
//! # Architecture
//!
//! Lines are tokenized and resolved by the [`Shell`](crate::core::Shell)
//! dispatcher, which checks arity and then calls the command's executor.
//! Executors return a [`CommandResult`]; they interpret their own argument
//! positions and check their own preconditions (e.g. a loaded binary).

mod data;
mod execute;
mod result;

pub use result::{CommandResult, ShellAction};

use std::collections::HashMap;

use crate::core::autocomplete::{complete_path, complete_symbol};
use crate::core::error::ShellError;
use crate::core::{Disassembler, Loader, Session};

// =============================================================================
// Command Entry
// =============================================================================

/// State an executor runs against.
pub struct Context<'a> {
    pub session: &'a mut Session,
    pub loader: &'a dyn Loader,
    pub disassembler: &'a dyn Disassembler,
    pub registry: &'a CommandRegistry,
}

/// Runs a command. `args[0]` is the command name.
pub type Executor = fn(&mut Context<'_>, &[String]) -> Result<CommandResult, ShellError>;

/// Produces completion remainders for the argument at a zero-based index.
pub type Completer = fn(&Session, usize, &str) -> Result<Vec<String>, ShellError>;

/// A registered command.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    /// Upper bound on arguments, not counting the command name.
    pub max_args: usize,
    /// `None` marks a placeholder that silently does nothing.
    pub executor: Option<Executor>,
    pub completer: Option<Completer>,
    /// Usage summary shown next to the name in `help`.
    pub usage: &'static str,
    /// Explanation lines shown under the usage.
    pub help: &'static [&'static str],
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("max_args", &self.max_args)
            .field("executor", &self.executor.is_some())
            .field("completer", &self.completer.is_some())
            .finish()
    }
}

impl Command {
    pub fn new(name: &'static str, max_args: usize, usage: &'static str) -> Self {
        Self {
            name,
            max_args,
            executor: None,
            completer: None,
            usage,
            help: &[],
        }
    }

    pub fn exec(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn complete(mut self, completer: Completer) -> Self {
        self.completer = Some(completer);
        self
    }

    pub fn help(mut self, help: &'static [&'static str]) -> Self {
        self.help = help;
        self
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Display order for `help` and command-name completion.
///
/// Kept separately from the map so listings never depend on hash order.
const DISPLAY_ORDER: &[&str] = &[
    "calls",
    "da",
    "db",
    "dd",
    "dw",
    "dq",
    "dump",
    "exit",
    "help",
    "info",
    "load",
    "lrawarm",
    "lrawmips",
    "lrawmips64",
    "lrawx86",
    "lrawx64",
    "save",
    "sections",
    "sym",
    "x",
    "display.print_section",
    "display.print_comments",
];

const DATA_USAGE: &str = "SYMBOL|0xXXXX|EP [NB_LINES]";

/// The command table.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, Command>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    /// An empty registry with the given display order.
    pub fn with_order(order: &[&'static str]) -> Self {
        Self {
            commands: HashMap::new(),
            order: order.to_vec(),
        }
    }

    /// The full command table of the shell.
    pub fn builtin() -> Self {
        let mut registry = Self::with_order(DISPLAY_ORDER);

        let table = [
            Command::new("help", 0, "")
                .exec(execute::help)
                .help(&["Display this help"]),
            Command::new("save", 0, "")
                .exec(execute::save)
                .help(&["Save the database (only symbols and history currently)."]),
            Command::new("load", 1, "filename")
                .exec(execute::load)
                .complete(complete_path)
                .help(&["Load a new binary file."]),
            Command::new("lrawx86", 1, "filename")
                .exec(execute::load_raw)
                .complete(complete_path)
                .help(&["Load a x86 raw file."]),
            Command::new("lrawx64", 1, "filename")
                .exec(execute::load_raw)
                .complete(complete_path)
                .help(&["Load a x64 raw file."]),
            Command::new("lrawarm", 1, "filename")
                .exec(execute::load_raw)
                .complete(complete_path)
                .help(&["Load a ARM raw file."]),
            Command::new("lrawmips", 1, "filename")
                .exec(execute::load_raw)
                .complete(complete_path)
                .help(&["Load a MIPS raw file."]),
            Command::new("lrawmips64", 1, "filename")
                .exec(execute::load_raw)
                .complete(complete_path)
                .help(&["Load a MIPS64 raw file."]),
            Command::new("x", 1, "[SYMBOL|0xXXXX|EP]")
                .exec(execute::decompile)
                .complete(complete_symbol)
                .help(&["Decompile. By default it will be main."]),
            Command::new("da", 2, DATA_USAGE)
                .exec(execute::data)
                .complete(complete_symbol)
                .help(&["Print data in ascii, it stops when the end of the section is found"]),
            Command::new("db", 2, DATA_USAGE)
                .exec(execute::data)
                .complete(complete_symbol)
                .help(&["Print data in bytes, it stops when the end of the section is found"]),
            Command::new("dd", 2, DATA_USAGE)
                .exec(execute::data)
                .complete(complete_symbol)
                .help(&["Print data in dwords, it stops when the end of the section is found"]),
            Command::new("dw", 2, DATA_USAGE)
                .exec(execute::data)
                .complete(complete_symbol)
                .help(&["Print data in words, it stops when the end of the section is found"]),
            Command::new("dq", 2, DATA_USAGE)
                .exec(execute::data)
                .complete(complete_symbol)
                .help(&["Print data in qwords, it stops when the end of the section is found"]),
            Command::new("dump", 2, DATA_USAGE)
                .exec(execute::dump)
                .complete(complete_symbol)
                .help(&["Disassemble only."]),
            Command::new("set", 3, "").help(&["Set options"]),
            Command::new("sym", 3, "[SYMBOL 0xXXXX] [| FILTER]")
                .exec(execute::sym)
                .complete(complete_symbol)
                .help(&[
                    "Print all symbols or set a new symbol.",
                    "You can filter symbols by searching the word FILTER.",
                ]),
            Command::new("calls", 1, "[SECTION_NAME]")
                .exec(execute::calls)
                .complete(complete_symbol)
                .help(&["Print all calls which are in the given section"]),
            Command::new("exit", 0, "")
                .exec(execute::exit)
                .help(&["Exit"]),
            Command::new("sections", 0, "")
                .exec(execute::sections)
                .help(&["Print all sections"]),
            Command::new("info", 0, "")
                .exec(execute::info)
                .help(&["Information about the current binary"]),
            Command::new("display.print_section", 0, "")
                .exec(execute::toggle_print_section)
                .help(&["Print or not section when an address is found"]),
            Command::new("display.print_comments", 0, "")
                .exec(execute::toggle_print_comments)
                .help(&["Print or not comments"]),
        ];

        for command in table {
            registry.register(command);
        }
        registry
    }

    /// Insert a command, replacing any previous entry of the same name.
    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name, command);
    }

    pub fn lookup(&self, name: &str) -> Result<&Command, ShellError> {
        self.commands.get(name).ok_or(ShellError::UnknownCommand)
    }

    /// Command names in display order.
    pub fn names(&self) -> &[&'static str] {
        &self.order
    }

    /// Registered commands in display order.
    pub fn ordered(&self) -> impl Iterator<Item = &Command> {
        self.order.iter().filter_map(|name| self.commands.get(name))
    }

    /// Every registered command, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }
}

// =============================================================================
// Tests
// =============================================================================
