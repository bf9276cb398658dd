//! Line input.
//!
//! [`LineReader`] is what the REPL reads from. [`RustylineReader`] is the
//! interactive implementation: it owns the `rustyline` editor and wires tab
//! completion to the shell through [`ShellHelper`].

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use log::warn;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};

use crate::core::{AutocompleteResult, Shell, ShellError};

/// What one read produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The operator cancelled the line (Ctrl-C).
    Interrupted,
    /// End of input (Ctrl-D or a closed stream).
    Eof,
}

pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome>;

    /// Append a line to the editor history.
    fn add_history(&mut self, line: &str);

    /// Drop the editor history and install `lines` instead.
    fn replace_history(&mut self, lines: &[String]);
}

// =============================================================================
// Completion
// =============================================================================

/// `rustyline` helper completing against the shared shell.
pub struct ShellHelper {
    shell: Rc<RefCell<Shell>>,
}

impl ShellHelper {
    pub fn new(shell: Rc<RefCell<Shell>>) -> Self {
        Self { shell }
    }
}

/// Insert `text` at the cursor.
fn insert(text: String) -> Pair {
    Pair {
        display: text.clone(),
        replacement: text,
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // The shell is only borrowed elsewhere while a command runs.
        let Ok(shell) = self.shell.try_borrow() else {
            return Ok((pos, Vec::new()));
        };

        let pairs = match shell.complete(&line[..pos]) {
            AutocompleteResult::Single { candidate, .. } => vec![insert(candidate)],
            AutocompleteResult::Multiple { common, .. } if !common.is_empty() => {
                vec![insert(common)]
            }
            AutocompleteResult::Multiple {
                token, candidates, ..
            } => candidates
                .into_iter()
                .map(|candidate| Pair {
                    display: format!("{}{}", token, candidate),
                    replacement: candidate,
                })
                .collect(),
            AutocompleteResult::TooMany => {
                eprintln!("\n{}", ShellError::TooManyCandidates);
                Vec::new()
            }
            AutocompleteResult::None => Vec::new(),
        };

        Ok((pos, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

// =============================================================================
// Interactive Reader
// =============================================================================

pub struct RustylineReader {
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl RustylineReader {
    pub fn new(shell: Rc<RefCell<Shell>>) -> rustyline::Result<Self> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(ShellHelper::new(shell)));
        Ok(Self { editor })
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e.to_string())),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            warn!("could not record history: {}", e);
        }
    }

    fn replace_history(&mut self, lines: &[String]) {
        if let Err(e) = self.editor.clear_history() {
            warn!("could not clear history: {}", e);
        }
        for line in lines {
            self.add_history(line);
        }
    }
}
