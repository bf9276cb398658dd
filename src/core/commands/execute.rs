//! Command executors.
//!
//! One function per command (the load and data families share theirs and
//! branch on `args[0]`). Every executor receives the full token list and
//! checks its own preconditions.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::config::{DEFAULT_ENTRY_SYMBOL, ENTRY_POINT_KEYWORD, HELP_TAB};
use crate::core::database::Database;
use crate::core::error::ShellError;
use crate::core::loader::LoadRequest;
use crate::core::session::{RawTarget, database_path_for};
use crate::models::{Arch, OutputLine};
use crate::utils::{format_address, format_section_row, format_size_ko, section_header};

use super::data::{self, DataUnit};
use super::{CommandResult, Context, ShellAction};

type ExecResult = Result<CommandResult, ShellError>;

const FILTER_USAGE: &str = "bad arguments (warn: need spaces between |)";

/// Turn text lines from a backend into command output.
fn lines(texts: Vec<String>) -> CommandResult {
    CommandResult::output(texts.into_iter().map(OutputLine::text).collect())
}

fn on_off(flag: bool) -> CommandResult {
    CommandResult::text(if flag { "now it's on" } else { "now it's off" })
}

/// Parse an optional line count, falling back to the session default.
fn line_count(ctx: &Context<'_>, arg: Option<&String>) -> Result<usize, ShellError> {
    match arg {
        None => Ok(ctx.session.default_lines),
        Some(text) => text
            .parse()
            .map_err(|_| ShellError::usage(format!("invalid number of lines: {}", text))),
    }
}

// =============================================================================
// Help / Exit
// =============================================================================

pub fn help(ctx: &mut Context<'_>, _args: &[String]) -> ExecResult {
    let mut output = Vec::new();
    for command in ctx.registry.ordered().filter(|c| c.executor.is_some()) {
        if command.usage.is_empty() {
            output.push(OutputLine::text(command.name));
        } else {
            output.push(OutputLine::text(format!("{} {}", command.name, command.usage)));
        }
        for line in command.help {
            output.push(OutputLine::text(format!("{}{}", HELP_TAB, line)));
        }
    }
    Ok(CommandResult::output(output))
}

pub fn exit(_ctx: &mut Context<'_>, _args: &[String]) -> ExecResult {
    Ok(CommandResult::exit())
}

// =============================================================================
// Load / Save
// =============================================================================

/// Reset the session and load `path`, merging saved symbols.
///
/// Returns the saved database, if one was found.
fn load_into_session(
    ctx: &mut Context<'_>,
    path: &str,
    raw: Option<RawTarget>,
) -> Result<Option<Database>, ShellError> {
    let path = PathBuf::from(path);
    ctx.session.reset();
    ctx.session.filename = Some(path.clone());
    ctx.session.raw = raw;

    let request = LoadRequest {
        path: path.clone(),
        raw: raw.map(|r| r.arch),
        big_endian: raw.is_some_and(|r| r.big_endian),
    };
    let mut binary = ctx.loader.load(&request)?;
    info!(
        "loaded {} ({}, {}, {} sections)",
        path.display(),
        binary.format,
        binary.arch,
        binary.sections.len()
    );

    let database = match ctx.session.database_path() {
        Some(db_path) => match Database::load(&db_path) {
            Ok(db) => db,
            Err(e) => {
                warn!("ignoring database: {}", e);
                None
            }
        },
        None => None,
    };

    if let Some(db) = &database {
        for (name, addr) in &db.symbols {
            binary.symbols.define(name.as_str(), *addr);
        }
        debug!("restored {} symbols", db.symbols.len());
    }

    ctx.session.binary = Some(binary);
    Ok(database)
}

pub fn load(ctx: &mut Context<'_>, args: &[String]) -> ExecResult {
    let [_, path] = args else {
        return Err(ShellError::usage("filename required"));
    };
    let history = load_into_session(ctx, path, None)?
        .map(|db| db.history)
        .unwrap_or_default();
    Ok(CommandResult::empty().with_action(ShellAction::ReplaceHistory(history)))
}

pub fn load_raw(ctx: &mut Context<'_>, args: &[String]) -> ExecResult {
    let [name, path] = args else {
        return Err(ShellError::usage("filename required"));
    };
    let default_big_endian = ctx.session.default_big_endian;
    let raw = match name.as_str() {
        "lrawx86" => RawTarget {
            arch: Arch::X86,
            big_endian: false,
        },
        "lrawx64" => RawTarget {
            arch: Arch::X64,
            big_endian: false,
        },
        "lrawarm" => RawTarget {
            arch: Arch::Arm,
            big_endian: default_big_endian,
        },
        "lrawmips" => RawTarget {
            arch: Arch::Mips,
            big_endian: default_big_endian,
        },
        "lrawmips64" => RawTarget {
            arch: Arch::Mips64,
            big_endian: default_big_endian,
        },
        _ => return Err(ShellError::UnknownCommand),
    };
    load_into_session(ctx, path, Some(raw))?;
    Ok(CommandResult::empty())
}

pub fn save(ctx: &mut Context<'_>, _args: &[String]) -> ExecResult {
    let binary = ctx.session.binary()?;
    let path = ctx
        .session
        .database_path()
        .unwrap_or_else(|| database_path_for(&binary.path));

    let db = Database {
        symbols: binary.symbols.to_map(),
        history: ctx.session.history.clone(),
    };
    db.save(&path)?;
    ctx.session.dirty = false;
    info!("saved {} symbols to {}", db.symbols.len(), path.display());

    Ok(CommandResult::output(vec![OutputLine::success(format!(
        "database saved to {}",
        path.display()
    ))]))
}

// =============================================================================
// Symbols
// =============================================================================

/// `sym`, `sym | FILTER`, `sym |FILTER`, `sym SYMBOL 0xXXXX`.
pub fn sym(ctx: &mut Context<'_>, args: &[String]) -> ExecResult {
    ctx.session.binary()?;

    match args {
        [_] => Ok(list_symbols(ctx, None)),
        [_, pipe, rest @ ..] if pipe.starts_with('|') => {
            let filter = match (pipe.as_str(), rest) {
                ("|", [filter]) => filter.as_str(),
                (glued, []) if glued.len() > 1 => &glued[1..],
                _ => return Err(ShellError::usage(FILTER_USAGE)),
            };
            Ok(list_symbols(ctx, Some(filter)))
        }
        [_, _] => Err(ShellError::usage("an address is required to save the symbol")),
        [_, name, addr] => {
            let change = ctx.session.define_symbol(name, addr)?;
            debug!("sym {} = {} ({:?})", name, addr, change);
            let mut output = Vec::new();
            if let Some(evicted) = change.evicted {
                output.push(OutputLine::info(format!(
                    "{} was bound to {} and has been removed",
                    evicted, addr
                )));
            }
            Ok(CommandResult::output(output))
        }
        _ => Err(ShellError::usage(FILTER_USAGE)),
    }
}

fn list_symbols(ctx: &Context<'_>, filter: Option<&str>) -> CommandResult {
    let Some(binary) = ctx.session.binary.as_ref() else {
        return CommandResult::empty();
    };
    let print_section = ctx.session.display.print_section;

    let output = binary
        .symbols
        .by_address()
        .filter(|(_, name)| filter.is_none_or(|f| name.contains(f)))
        .map(|(addr, name)| {
            let section = binary
                .section_at(addr)
                .filter(|_| print_section)
                .map(|s| s.name.as_str());
            OutputLine::text(format!("{}  {}", format_address(addr, section), name))
        })
        .collect();
    CommandResult::output(output)
}

// =============================================================================
// Analysis
// =============================================================================

pub fn decompile(ctx: &mut Context<'_>, args: &[String]) -> ExecResult {
    let session = &*ctx.session;
    let binary = session.binary()?;
    let entry = match args.get(1) {
        Some(entry) => entry.as_str(),
        None if binary.symbols.address_of(DEFAULT_ENTRY_SYMBOL).is_some() => {
            DEFAULT_ENTRY_SYMBOL
        }
        None => ENTRY_POINT_KEYWORD,
    };
    let addr = session.resolve_entry(entry)?;
    debug!("decompile {} at 0x{:x}", entry, addr);
    Ok(lines(ctx.disassembler.decompile(binary, addr, &session.display)?))
}

pub fn dump(ctx: &mut Context<'_>, args: &[String]) -> ExecResult {
    let session = &*ctx.session;
    let binary = session.binary()?;
    let entry = args.get(1).map_or(ENTRY_POINT_KEYWORD, String::as_str);
    let addr = session.resolve_entry(entry)?;
    let count = line_count(ctx, args.get(2))?;
    Ok(lines(ctx.disassembler.disassemble(
        binary,
        addr,
        count,
        &session.display,
    )?))
}

/// `da`/`db`/`dw`/`dd`/`dq`, rendered from the section bytes directly.
pub fn data(ctx: &mut Context<'_>, args: &[String]) -> ExecResult {
    let unit = DataUnit::from_command(&args[0]).ok_or(ShellError::UnknownCommand)?;
    let session = &*ctx.session;
    let binary = session.binary()?;
    let entry = args.get(1).map_or(ENTRY_POINT_KEYWORD, String::as_str);
    let addr = session.resolve_entry(entry)?;
    let count = line_count(ctx, args.get(2))?;

    let bytes = binary.bytes_from(addr).ok_or_else(|| {
        ShellError::Analysis(format!("0x{:x} is not in a mapped section", addr))
    })?;
    let section = binary
        .section_at(addr)
        .filter(|_| session.display.print_section)
        .map(|s| s.name.as_str());

    Ok(lines(data::dump(
        unit,
        addr,
        bytes,
        count,
        binary.big_endian,
        section,
    )))
}

pub fn calls(ctx: &mut Context<'_>, args: &[String]) -> ExecResult {
    let [_, section] = args else {
        return Err(ShellError::usage("section required"));
    };
    let binary = ctx.session.binary()?;
    if !binary.sections.iter().any(|s| &s.name == section) {
        return Err(ShellError::usage(format!("unknown section: {}", section)));
    }
    Ok(lines(ctx.disassembler.calls_in_section(binary, section)?))
}

// =============================================================================
// Info / Display
// =============================================================================

pub fn sections(ctx: &mut Context<'_>, _args: &[String]) -> ExecResult {
    let binary = ctx.session.binary()?;
    let mut output = vec![OutputLine::text(section_header())];
    output.extend(
        binary
            .sections
            .iter()
            .map(|s| OutputLine::text(format_section_row(s))),
    );
    Ok(CommandResult::output(output))
}

pub fn info(ctx: &mut Context<'_>, _args: &[String]) -> ExecResult {
    let Some(filename) = &ctx.session.filename else {
        return Ok(CommandResult::text("no file loaded"));
    };
    let binary = ctx.session.binary()?;
    let size = std::fs::metadata(filename)
        .map(|m| m.len())
        .unwrap_or(binary.data.len() as u64);
    let endianness = if binary.big_endian {
        "big endian"
    } else {
        "little endian"
    };

    Ok(CommandResult::output(vec![
        OutputLine::text(format!("File: {}", filename.display())),
        OutputLine::text(format!("Size: {}", format_size_ko(size))),
        OutputLine::text(format!("Type: {}", binary.format)),
        OutputLine::text(format!("Arch: {}", binary.arch)),
        OutputLine::text(format!("Endianess: {}", endianness)),
    ]))
}

pub fn toggle_print_section(ctx: &mut Context<'_>, _args: &[String]) -> ExecResult {
    let display = &mut ctx.session.display;
    display.print_section = !display.print_section;
    Ok(on_off(display.print_section))
}

pub fn toggle_print_comments(ctx: &mut Context<'_>, _args: &[String]) -> ExecResult {
    let display = &mut ctx.session.display;
    display.print_comments = !display.print_comments;
    Ok(on_off(display.print_comments))
}
