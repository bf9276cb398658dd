//! The read-eval-print loop.
//!
//! [`Repl`] is a small state machine over [`ReplState`]. While `Running` it
//! reads and dispatches lines until the input component hands control back
//! (end of input), then consults the dirty flag. The `exit` command skips
//! that check entirely.

use std::cell::RefCell;
use std::io::{self, Stderr, Stdout, Write};
use std::rc::Rc;

use log::debug;

use crate::config::{PROMPT, UNSAVED_WARNING};
use crate::core::{CommandResult, Shell, ShellAction, ShellError};
use crate::models::OutputLine;

use super::input::{LineReader, ReadOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplState {
    Running,
    /// End of input arrived with unsaved changes.
    AwaitingSave,
    Terminated,
}

pub struct Repl<R, W = Stdout, E = Stderr> {
    shell: Rc<RefCell<Shell>>,
    reader: R,
    state: ReplState,
    out: W,
    err: E,
}

impl<R: LineReader> Repl<R> {
    /// A REPL printing to the process stdout and stderr.
    pub fn new(shell: Rc<RefCell<Shell>>, reader: R) -> Self {
        Self::with_output(shell, reader, io::stdout(), io::stderr())
    }
}

impl<R: LineReader, W: Write, E: Write> Repl<R, W, E> {
    pub fn with_output(shell: Rc<RefCell<Shell>>, reader: R, out: W, err: E) -> Self {
        Self {
            shell,
            reader,
            state: ReplState::Running,
            out,
            err,
        }
    }

    pub fn state(&self) -> ReplState {
        self.state
    }

    pub fn shell(&self) -> &Rc<RefCell<Shell>> {
        &self.shell
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn errors(&self) -> &E {
        &self.err
    }

    /// Run until the loop terminates.
    pub fn run(&mut self) -> io::Result<()> {
        while self.state != ReplState::Terminated {
            self.step()?;
        }
        Ok(())
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self) -> io::Result<ReplState> {
        self.state = match self.state {
            ReplState::Running => self.read_cycle()?,
            ReplState::AwaitingSave => {
                writeln!(self.err, "{}", UNSAVED_WARNING)?;
                ReplState::Running
            }
            ReplState::Terminated => ReplState::Terminated,
        };
        debug!("repl state: {:?}", self.state);
        Ok(self.state)
    }

    /// Run commands given outside the prompt (startup load, `-x` entry).
    ///
    /// They are not recorded in the history. Returns `false` when one of
    /// them asked to exit.
    pub fn run_startup(&mut self, commands: &[Vec<String>]) -> io::Result<bool> {
        for tokens in commands {
            let result = self.shell.borrow_mut().run(tokens);
            if self.handle(result)? {
                self.state = ReplState::Terminated;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Read and dispatch until exit or end of input.
    fn read_cycle(&mut self) -> io::Result<ReplState> {
        loop {
            match self.reader.read_line(PROMPT)? {
                ReadOutcome::Line(line) => {
                    if self.dispatch(&line)? {
                        return Ok(ReplState::Terminated);
                    }
                }
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => break,
            }
        }

        if self.shell.borrow().session().dirty {
            Ok(ReplState::AwaitingSave)
        } else {
            Ok(ReplState::Terminated)
        }
    }

    /// Dispatch one submitted line. Returns `true` on an exit request.
    fn dispatch(&mut self, line: &str) -> io::Result<bool> {
        let result = self.shell.borrow_mut().execute(line);
        let succeeded = result.is_ok();
        let exit = self.handle(result)?;
        if succeeded && !line.trim().is_empty() {
            self.remember(line);
        }
        Ok(exit)
    }

    /// Apply a command's action and print its output.
    fn handle(&mut self, result: Result<CommandResult, ShellError>) -> io::Result<bool> {
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                self.render(&[OutputLine::error(format!("error: {}", e))])?;
                return Ok(false);
            }
        };

        let exit = match result.action {
            Some(ShellAction::Exit) => true,
            Some(ShellAction::ReplaceHistory(history)) => {
                self.reader.replace_history(&history);
                self.shell.borrow_mut().session_mut().history = history;
                false
            }
            None => false,
        };
        self.render(&result.output)?;
        Ok(exit)
    }

    fn remember(&mut self, line: &str) {
        self.reader.add_history(line);
        self.shell
            .borrow_mut()
            .session_mut()
            .history
            .push(line.to_string());
    }

    fn render(&mut self, lines: &[OutputLine]) -> io::Result<()> {
        for line in lines {
            if line.is_error() {
                writeln!(self.err, "{}", line.as_str())?;
            } else {
                writeln!(self.out, "{}", line.as_str())?;
            }
        }
        Ok(())
    }
}
