//! Command execution result type.

use crate::models::OutputLine;

/// Side effects a command asks the REPL to carry out.
///
/// Commands never touch the input component themselves; anything that
/// affects the loop or the line history travels back through this.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellAction {
    /// Leave the REPL immediately, unsaved changes or not.
    Exit,
    /// Replace the input history (after a load restored a database).
    ReplaceHistory(Vec<String>),
}

/// Result of executing a command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Output lines to display
    pub output: Vec<OutputLine>,
    /// Optional request for the REPL
    pub action: Option<ShellAction>,
}

impl CommandResult {
    /// Create a result with just output.
    pub fn output(lines: Vec<OutputLine>) -> Self {
        Self {
            output: lines,
            action: None,
        }
    }

    /// Create a result with a single line of text.
    pub fn text(line: impl Into<String>) -> Self {
        Self::output(vec![OutputLine::text(line)])
    }

    /// Create an empty result (no output, no action).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn exit() -> Self {
        Self {
            output: vec![],
            action: Some(ShellAction::Exit),
        }
    }

    /// Attach an action to this result.
    pub fn with_action(mut self, action: ShellAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn is_exit(&self) -> bool {
        matches!(self.action, Some(ShellAction::Exit))
    }
}
