//! Line dispatcher.
//!
//! [`Shell`] owns the command table, the session and the external
//! collaborators, and turns submitted lines into command invocations.

use log::debug;

use crate::core::autocomplete::{AutocompleteResult, autocomplete};
use crate::core::commands::{CommandRegistry, CommandResult, Context};
use crate::core::error::ShellError;
use crate::core::parser::tokenize;
use crate::core::{Disassembler, Loader, NoBackend, ObjectLoader, Session};

pub struct Shell {
    registry: CommandRegistry,
    session: Session,
    loader: Box<dyn Loader>,
    disassembler: Box<dyn Disassembler>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(Session::new(), Box::new(ObjectLoader), Box::new(NoBackend))
    }
}

impl Shell {
    /// A shell with the builtin command table.
    pub fn new(
        session: Session,
        loader: Box<dyn Loader>,
        disassembler: Box<dyn Disassembler>,
    ) -> Self {
        Self {
            registry: CommandRegistry::builtin(),
            session,
            loader,
            disassembler,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Tokenize and run a submitted line.
    ///
    /// A blank line is a no-op.
    pub fn execute(&mut self, line: &str) -> Result<CommandResult, ShellError> {
        let tokens = tokenize(line)?;
        self.run(&tokens)
    }

    /// Run an already tokenized command line.
    pub fn run(&mut self, tokens: &[String]) -> Result<CommandResult, ShellError> {
        let Some(name) = tokens.first() else {
            return Ok(CommandResult::empty());
        };

        let command = *self.registry.lookup(name)?;
        if tokens.len() - 1 > command.max_args {
            return Err(ShellError::TooManyArguments {
                name: command.name.to_string(),
                max: command.max_args,
            });
        }

        let Some(executor) = command.executor else {
            debug!("{} has no executor", command.name);
            return Ok(CommandResult::empty());
        };

        debug!("dispatching {:?}", tokens);
        let mut ctx = Context {
            session: &mut self.session,
            loader: self.loader.as_ref(),
            disassembler: self.disassembler.as_ref(),
            registry: &self.registry,
        };
        executor(&mut ctx, tokens)
    }

    /// Complete the word at the end of an in-progress line.
    pub fn complete(&self, line: &str) -> AutocompleteResult {
        autocomplete(line, &self.registry, &self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::Command;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_blank_line_is_noop() {
        let mut shell = Shell::default();
        assert_eq!(shell.execute("   ").unwrap(), CommandResult::empty());
    }

    #[test]
    fn test_unknown_command() {
        let mut shell = Shell::default();
        let err = shell.execute("foobar").unwrap_err();
        assert!(matches!(err, ShellError::UnknownCommand));
        assert_eq!(err.to_string(), "unknown command");
    }

    #[test]
    fn test_tokenize_error_is_reported() {
        let mut shell = Shell::default();
        assert!(matches!(
            shell.execute("load \"unterminated"),
            Err(ShellError::Tokenize(_))
        ));
    }

    #[test]
    fn test_max_args_enforced_for_every_command() {
        let mut shell = Shell::default();
        let commands: Vec<Command> = shell.registry().iter().copied().collect();
        for command in commands {
            let mut tokens = vec![command.name.to_string()];
            tokens.extend((0..=command.max_args).map(|i| format!("a{}", i)));
            match shell.run(&tokens) {
                Err(ShellError::TooManyArguments { name, max }) => {
                    assert_eq!(name, command.name);
                    assert_eq!(max, command.max_args);
                }
                other => panic!("{}: expected TooManyArguments, got {:?}", command.name, other),
            }
        }
    }

    #[test]
    fn test_max_args_itself_is_accepted() {
        let mut shell = Shell::default();
        let commands: Vec<Command> = shell
            .registry()
            .iter()
            .copied()
            .filter(|c| c.name != "exit")
            .collect();
        for command in commands {
            let mut tokens = vec![command.name.to_string()];
            tokens.extend((0..command.max_args).map(|i| format!("a{}", i)));
            let result = shell.run(&tokens);
            assert!(
                !matches!(result, Err(ShellError::TooManyArguments { .. })),
                "{} rejected {} args",
                command.name,
                command.max_args
            );
        }
    }

    #[test]
    fn test_too_many_arguments_message() {
        let mut shell = Shell::default();
        let err = shell.execute("load a b").unwrap_err();
        assert_eq!(err.to_string(), "load takes max 1 args");
    }

    #[test]
    fn test_placeholder_command_is_silent() {
        let mut shell = Shell::default();
        assert_eq!(shell.run(&args(&["set", "a", "b"])).unwrap(), CommandResult::empty());
    }

    #[test]
    fn test_exit_requests_exit() {
        let mut shell = Shell::default();
        assert!(shell.execute("exit").unwrap().is_exit());
    }
}
