//! Tab autocomplete for the shell.
//!
//! This module provides completion for:
//! - Command names (e.g., "lr" -> "lrawarm", "lrawmips", ...)
//! - File paths for the load commands
//! - Symbol names for commands taking an address
//!
//! Candidates are remainders: the text to append after what the operator
//! already typed, ending with a space (or `/` for directories) so they can
//! be inserted verbatim.

use std::fs;
use std::path::Path;

use log::debug;

use crate::config::MAX_COMPLETIONS;
use crate::core::commands::CommandRegistry;
use crate::core::error::ShellError;
use crate::core::parser::split_partial;
use crate::core::Session;

// ============================================================================
// Public Types
// ============================================================================

/// Result of an autocomplete attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutocompleteResult {
    /// Single match - append `candidate` to the line.
    Single { token: String, candidate: String },
    /// Multiple matches with the prefix they all share.
    Multiple {
        token: String,
        common: String,
        candidates: Vec<String>,
    },
    /// No matches found.
    None,
    /// More matches than [`MAX_COMPLETIONS`]; completion was abandoned.
    TooMany,
}

impl AutocompleteResult {
    /// All candidates, empty for `None` and `TooMany`.
    pub fn candidates(&self) -> Vec<String> {
        match self {
            Self::Single { candidate, .. } => vec![candidate.clone()],
            Self::Multiple { candidates, .. } => candidates.clone(),
            Self::None | Self::TooMany => Vec::new(),
        }
    }
}

/// Bounded candidate collector.
#[derive(Debug, Default)]
struct Candidates(Vec<String>);

impl Candidates {
    fn push(&mut self, candidate: String) -> Result<(), ShellError> {
        if self.0.len() == MAX_COMPLETIONS {
            return Err(ShellError::TooManyCandidates);
        }
        self.0.push(candidate);
        Ok(())
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Complete the word under the cursor at the end of `line`.
pub fn autocomplete(
    line: &str,
    registry: &CommandRegistry,
    session: &Session,
) -> AutocompleteResult {
    let partial = match split_partial(line) {
        Ok(partial) => partial,
        Err(e) => {
            debug!("no completion for unbalanced line: {}", e);
            return AutocompleteResult::None;
        }
    };
    let token = partial.last().to_string();

    let candidates = match partial.arg_index() {
        None => complete_command(registry, &token),
        Some(index) => match registry.lookup(partial.command()) {
            Ok(command) => match command.completer {
                Some(completer) => completer(session, index, &token),
                None => Ok(Vec::new()),
            },
            Err(_) => Ok(Vec::new()),
        },
    };

    match candidates {
        Ok(candidates) => build_result(token, candidates),
        Err(ShellError::TooManyCandidates) => AutocompleteResult::TooMany,
        Err(e) => {
            debug!("completion failed: {}", e);
            AutocompleteResult::None
        }
    }
}

fn build_result(token: String, mut candidates: Vec<String>) -> AutocompleteResult {
    match candidates.len() {
        0 => AutocompleteResult::None,
        1 => AutocompleteResult::Single {
            token,
            candidate: candidates.remove(0),
        },
        _ => AutocompleteResult::Multiple {
            token,
            common: find_common_prefix(&candidates),
            candidates,
        },
    }
}

// ============================================================================
// Command Completion
// ============================================================================

/// Complete a command name against the display order.
fn complete_command(registry: &CommandRegistry, partial: &str) -> Result<Vec<String>, ShellError> {
    let mut out = Candidates::default();
    for name in registry.names() {
        if let Some(rest) = name.strip_prefix(partial) {
            out.push(format!("{} ", rest))?;
        }
    }
    Ok(out.0)
}

// ============================================================================
// Path Completion
// ============================================================================

/// Split a partial path the way `dirname`/`basename` do.
fn split_path(partial: &str) -> (&str, &str) {
    match partial.rfind('/') {
        Some(0) => ("/", &partial[1..]),
        Some(idx) => (&partial[..idx], &partial[idx + 1..]),
        None => (".", partial),
    }
}

/// Complete a file path (first argument of the load commands).
///
/// Spaces in the remainder are backslash-escaped. Directories get a
/// trailing `/`, files a trailing space. An unreadable directory simply
/// yields nothing.
pub fn complete_path(
    _session: &Session,
    arg: usize,
    partial: &str,
) -> Result<Vec<String>, ShellError> {
    if arg != 0 {
        return Ok(Vec::new());
    }

    let (dir, base) = split_path(partial);
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("cannot list {}: {}", dir, e);
            return Ok(Vec::new());
        }
    };

    let mut names: Vec<(String, bool)> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            name.starts_with(base).then(|| {
                let is_dir = Path::new(dir).join(&name).is_dir();
                (name, is_dir)
            })
        })
        .collect();
    names.sort();

    let mut out = Candidates::default();
    for (name, is_dir) in names {
        let rest = name[base.len()..].replace(' ', "\\ ");
        let suffix = if is_dir { "/" } else { " " };
        out.push(format!("{}{}", rest, suffix))?;
    }
    Ok(out.0)
}

// ============================================================================
// Symbol Completion
// ============================================================================

/// Complete a symbol name (first argument of address-taking commands).
pub fn complete_symbol(
    session: &Session,
    arg: usize,
    partial: &str,
) -> Result<Vec<String>, ShellError> {
    let Some(binary) = session.binary.as_ref() else {
        return Ok(Vec::new());
    };
    if arg != 0 {
        return Ok(Vec::new());
    }

    let mut out = Candidates::default();
    for name in binary.symbols.names() {
        if let Some(rest) = name.strip_prefix(partial) {
            out.push(format!("{} ", rest))?;
        }
    }
    Ok(out.0)
}

// ============================================================================
// Utilities
// ============================================================================

/// Longest prefix shared by every string.
///
/// Comparison never runs past the shortest string.
pub fn find_common_prefix(strings: &[String]) -> String {
    let Some(shortest) = strings.iter().min_by_key(|s| s.chars().count()) else {
        return String::new();
    };

    let mut prefix: Vec<char> = shortest.chars().collect();
    for s in strings {
        let shared = prefix
            .iter()
            .zip(s.chars())
            .take_while(|(a, b)| **a == *b)
            .count();
        prefix.truncate(shared);
    }

    prefix.into_iter().collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SymbolTable;
    use crate::models::{Arch, BinaryFormat, LoadedBinary};
    use std::path::PathBuf;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn session_with_symbols(names: &[&str]) -> Session {
        let mut session = Session::new();
        session.binary = Some(LoadedBinary {
            path: PathBuf::from("a.out"),
            format: BinaryFormat::Elf,
            arch: Arch::X64,
            big_endian: false,
            entry: 0,
            symbols: names
                .iter()
                .enumerate()
                .map(|(i, n)| (n.to_string(), i as u64 * 0x10))
                .collect::<SymbolTable>(),
            sections: vec![],
            data: vec![],
        });
        session
    }

    #[test]
    fn test_command_completion_single() {
        let registry = CommandRegistry::builtin();
        let result = autocomplete("lo", &registry, &Session::new());
        assert_eq!(
            result,
            AutocompleteResult::Single {
                token: "lo".to_string(),
                candidate: "ad ".to_string(),
            }
        );
    }

    #[test]
    fn test_command_completion_multiple() {
        let registry = CommandRegistry::builtin();
        match autocomplete("lr", &registry, &Session::new()) {
            AutocompleteResult::Multiple {
                token,
                common,
                candidates,
            } => {
                assert_eq!(token, "lr");
                assert_eq!(common, "aw");
                assert_eq!(
                    candidates,
                    strings(&["awarm ", "awmips ", "awmips64 ", "awx86 ", "awx64 "])
                );
            }
            other => panic!("Expected multiple matches, got {:?}", other),
        }
    }

    #[test]
    fn test_command_completion_keeps_display_order() {
        let registry = CommandRegistry::builtin();
        let candidates = autocomplete("d", &registry, &Session::new()).candidates();
        assert_eq!(
            candidates,
            strings(&[
                "a ",
                "b ",
                "d ",
                "w ",
                "q ",
                "ump ",
                "isplay.print_section ",
                "isplay.print_comments ",
            ])
        );
    }

    #[test]
    fn test_common_prefix_of_load_family() {
        let registry = CommandRegistry::builtin();
        match autocomplete("l", &registry, &Session::new()) {
            AutocompleteResult::Multiple {
                common, candidates, ..
            } => {
                assert_eq!(candidates.len(), 6);
                assert_eq!(common, "");
            }
            other => panic!("Expected multiple matches, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match() {
        let registry = CommandRegistry::builtin();
        assert_eq!(
            autocomplete("xyz", &registry, &Session::new()),
            AutocompleteResult::None
        );
    }

    #[test]
    fn test_unknown_command_argument() {
        let registry = CommandRegistry::builtin();
        assert_eq!(
            autocomplete("nope ar", &registry, &Session::new()),
            AutocompleteResult::None
        );
    }

    #[test]
    fn test_command_without_completer() {
        let registry = CommandRegistry::builtin();
        assert_eq!(
            autocomplete("help ", &registry, &Session::new()),
            AutocompleteResult::None
        );
    }

    #[test]
    fn test_unbalanced_quote_yields_nothing() {
        let registry = CommandRegistry::builtin();
        assert_eq!(
            autocomplete("load \"abc", &registry, &Session::new()),
            AutocompleteResult::None
        );
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(
            find_common_prefix(&strings(&["hello", "help", "helicopter"])),
            "hel"
        );
        assert_eq!(find_common_prefix(&strings(&["abc", "ab"])), "ab");
        assert_eq!(find_common_prefix(&strings(&["ab", "abc", "ab"])), "ab");
        assert_eq!(find_common_prefix(&strings(&["x", "y"])), "");
        assert_eq!(find_common_prefix(&strings(&["", "abc"])), "");
        assert_eq!(find_common_prefix(&[]), "");
    }

    #[test]
    fn test_common_prefix_is_case_sensitive() {
        assert_eq!(find_common_prefix(&strings(&["Main", "main"])), "");
    }

    #[test]
    fn test_common_prefix_multibyte() {
        assert_eq!(find_common_prefix(&strings(&["héllo", "hélas"])), "hél");
    }

    #[test]
    fn test_symbol_completion() {
        let registry = CommandRegistry::builtin();
        let session = session_with_symbols(&["main", "malloc", "free"]);
        match autocomplete("x ma", &registry, &session) {
            AutocompleteResult::Multiple {
                token,
                common,
                candidates,
            } => {
                assert_eq!(token, "ma");
                assert_eq!(candidates, strings(&["in ", "lloc "]));
                assert_eq!(common, "");
            }
            other => panic!("Expected multiple matches, got {:?}", other),
        }
        assert_eq!(
            autocomplete("sym fr", &registry, &session).candidates(),
            strings(&["ee "])
        );
    }

    #[test]
    fn test_symbol_completion_second_argument() {
        let registry = CommandRegistry::builtin();
        let session = session_with_symbols(&["main"]);
        assert_eq!(
            autocomplete("db main m", &registry, &session),
            AutocompleteResult::None
        );
    }

    #[test]
    fn test_symbol_completion_without_binary() {
        assert!(complete_symbol(&Session::new(), 0, "ma").unwrap().is_empty());
    }

    #[test]
    fn test_symbol_completion_overflow() {
        let registry = CommandRegistry::builtin();
        let names: Vec<String> = (0..=MAX_COMPLETIONS).map(|i| format!("sub_{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let session = session_with_symbols(&refs);
        assert_eq!(
            autocomplete("x sub_", &registry, &session),
            AutocompleteResult::TooMany
        );
    }

    #[test]
    fn test_symbol_completion_at_cap() {
        let names: Vec<String> = (0..MAX_COMPLETIONS).map(|i| format!("sub_{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let session = session_with_symbols(&refs);
        assert_eq!(
            complete_symbol(&session, 0, "sub_").unwrap().len(),
            MAX_COMPLETIONS
        );
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("foo"), (".", "foo"));
        assert_eq!(split_path("dir/fo"), ("dir", "fo"));
        assert_eq!(split_path("dir/"), ("dir", ""));
        assert_eq!(split_path("/et"), ("/", "et"));
        assert_eq!(split_path(""), (".", ""));
    }

    #[test]
    fn test_path_completion() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("bins")).unwrap();
        fs::write(dir.path().join("binary.elf"), b"").unwrap();
        fs::write(dir.path().join("my file"), b"").unwrap();

        let root = dir.path().to_str().unwrap();
        let session = Session::new();

        let found = complete_path(&session, 0, &format!("{}/bin", root)).unwrap();
        assert_eq!(found, strings(&["ary.elf ", "s/"]));

        let found = complete_path(&session, 0, &format!("{}/my", root)).unwrap();
        assert_eq!(found, strings(&["\\ file "]));
    }

    #[test]
    fn test_path_completion_through_engine() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("my file"), b"").unwrap();
        let root = dir.path().to_str().unwrap();
        let registry = CommandRegistry::builtin();

        let result = autocomplete(&format!("load {}/my\\ f", root), &registry, &Session::new());
        assert_eq!(result.candidates(), strings(&["ile "]));
    }

    #[test]
    fn test_path_completion_missing_directory() {
        let found = complete_path(&Session::new(), 0, "/definitely/not/here/x").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_path_completion_only_first_argument() {
        assert!(complete_path(&Session::new(), 1, "").unwrap().is_empty());
    }
}
