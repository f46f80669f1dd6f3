//! things-drv - Interpreter driver.
//!
//! Orchestrates the pipeline: source text → lexer → parser → evaluator,
//! over an environment with the standard packages registered. The driver
//! owns the error split the CLI surfaces as exit codes: I/O failures (2),
//! parse errors (3), and runtime errors, which are program *results* and
//! leave the exit code at 0.

use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use things_eval::{eval_program, install};
use things_lex::{Lexer, DEFAULT_TAB_SIZE};
use things_par::Parser;
use things_rt::{Clock, Environment, Outcome, SharedWriter};

/// Driver-level failures, as opposed to in-language runtime errors.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Reading the source failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The parser reported errors; the program never ran.
    #[error("{}", .0.join("\n"))]
    Parse(Vec<String>),
}

/// Environment configuration applied before packages are registered.
pub struct Config {
    /// Columns a tab advances in source positions.
    pub tab_size: u32,
    /// Writer for the `fmt` package; process stdout when absent.
    pub stdout: Option<SharedWriter>,
    /// Clock for the `time` package; the system clock when absent.
    pub clock: Option<Clock>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            stdout: None,
            clock: None,
        }
    }
}

/// A ready-to-run interpreter: a configured environment with the standard
/// packages loaded. One session can evaluate any number of programs;
/// bindings persist between them.
pub struct Session {
    env: Rc<Environment>,
    tab_size: u32,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let env = Environment::new();
        if let Some(writer) = config.stdout {
            env.set_stdout(writer);
        }
        if let Some(clock) = config.clock {
            env.set_clock(clock);
        }
        install(&env);
        env.register_packages(things_std::packages());
        Self {
            env,
            tab_size: config.tab_size,
        }
    }

    /// The session's root environment.
    pub fn env(&self) -> &Rc<Environment> {
        &self.env
    }

    /// Lexes, parses, and evaluates one source text. A non-empty parser
    /// error list aborts before evaluation.
    pub fn eval(&self, source: &str) -> Result<Outcome, DriverError> {
        let lexer = Lexer::with_tab_size(source, self.tab_size);
        let mut parser = Parser::new(lexer);
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            debug!(errors = parser.errors().len(), "parsing failed");
            return Err(DriverError::Parse(parser.errors().to_vec()));
        }
        debug!(statements = program.statements.len(), "parsed program");
        let outcome = eval_program(&program, &self.env);
        debug!(ok = outcome.is_ok(), "evaluation finished");
        Ok(outcome)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
