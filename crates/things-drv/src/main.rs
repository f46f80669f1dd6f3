//! The `things` binary: run a ThingScript source file, stdin, or a
//! one-liner.
//!
//! Exit codes: 0 on success (including a program whose result is a runtime
//! error — it parsed and ran), 2 when the source cannot be read, 3 when the
//! parser reports errors.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use things_drv::{Config, DriverError, Session};
use things_lex::DEFAULT_TAB_SIZE;

/// ThingScript interpreter
#[derive(Parser, Debug)]
#[command(name = "things")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run ThingScript programs", long_about = None)]
struct Cli {
    /// Script file to run; reads stdin when absent
    file: Option<PathBuf>,

    /// Evaluate a source snippet and print its result
    #[arg(short, long, conflicts_with = "file")]
    eval: Option<String>,

    /// Number of columns a tab advances in source positions
    #[arg(long, default_value_t = DEFAULT_TAB_SIZE, env = "THINGS_TAB_SIZE")]
    tab_size: u32,

    /// Enable verbose output
    #[arg(short, long, env = "THINGS_VERBOSE")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let (source, print_result) = match read_source(&cli) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let session = Session::new(Config {
        tab_size: cli.tab_size,
        ..Config::default()
    });

    match session.eval(&source) {
        Err(DriverError::Parse(errors)) => {
            for error in &errors {
                eprintln!("parse error: {error}");
            }
            ExitCode::from(3)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
        Ok(Err(signal)) => {
            // A runtime error is the program's result, not a driver failure.
            eprintln!("{signal}");
            ExitCode::SUCCESS
        }
        Ok(Ok(value)) => {
            if print_result && !value.is_null() {
                println!("{}", value.inspect());
            }
            ExitCode::SUCCESS
        }
    }
}

/// Reads the program text. The boolean says whether the final value should
/// be printed (one-liners only; file and stdin programs print via `fmt`).
fn read_source(cli: &Cli) -> Result<(String, bool), std::io::Error> {
    if let Some(snippet) = &cli.eval {
        return Ok((snippet.clone(), true));
    }
    match &cli.file {
        Some(path) => Ok((std::fs::read_to_string(path)?, false)),
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok((source, false))
        }
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))?;

    Ok(())
}
