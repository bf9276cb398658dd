use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use log::{LevelFilter, error};

use disasm_shell::config::ShellConfig;
use disasm_shell::core::{NoBackend, ObjectLoader, Session, Shell};
use disasm_shell::terminal::{Repl, RustylineReader};

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let config = ShellConfig::parse();
    init_logging(config.verbose);

    let mut session = Session::new();
    session.default_lines = config.lines;
    session.default_big_endian = config.big_endian;
    let shell = Rc::new(RefCell::new(Shell::new(
        session,
        Box::new(ObjectLoader),
        Box::new(NoBackend),
    )));

    let reader = match RustylineReader::new(Rc::clone(&shell)) {
        Ok(reader) => reader,
        Err(e) => {
            error!("failed to initialize the line editor: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut repl = Repl::new(shell, reader);
    let outcome = repl
        .run_startup(&config.startup_commands())
        .and_then(|keep_going| if keep_going { repl.run() } else { Ok(()) });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
