//! unitdc - reverse-Polish calculator for physical quantities
//!
//! Usage:
//!   unitdc                         interactive session on stdin
//!   unitdc -e "1 (ng) 1 (ul) / p"  evaluate one expression
//!   unitdc script.udc              evaluate a file line by line

mod config;
mod logging;
mod repl;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use unitdc_rpn::Interpreter;
use unitdc_units::Registry;

use crate::config::Config;
use crate::repl::{OutputFormat, Printer, Repl};

#[derive(Parser, Debug)]
#[clap(name = "unitdc", version)]
#[clap(about = "Reverse-Polish calculator for physical quantities")]
struct Args {
    /// Script to evaluate, one batch per line
    #[clap(conflicts_with = "expr")]
    file: Option<PathBuf>,

    /// Evaluate a single expression and exit
    #[clap(short = 'e', long = "expr")]
    expr: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Configuration file (defaults to ./unitdc.toml when present)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the unit catalog and exit
    #[clap(long)]
    list_units: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config.logging, args.verbose).context("Failed to initialize logging")?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Starting unitdc");

    let registry = Registry::builder()
        .declare(&config.units)
        .context("Invalid unit declarations")?
        .build()
        .context("Invalid unit catalog")?;
    tracing::debug!(
        base_units = registry.base_units().len(),
        derived_units = registry.derived_units().len(),
        "Unit catalog ready"
    );

    if args.list_units {
        repl::write_catalog(&registry, &mut io::stdout().lock())
            .context("Failed to write unit catalog")?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut interpreter = Interpreter::new(Arc::new(registry));
    let mut printer = Printer::new(
        io::stdout(),
        io::stderr(),
        args.format,
        config.repl.precision,
    );

    if let Some(expr) = &args.expr {
        interpreter
            .evaluate(expr, &mut printer)
            .context("Failed to write output")?;
    } else if let Some(path) = &args.file {
        let file = File::open(path)
            .with_context(|| format!("Failed to open script {}", path.display()))?;
        Repl::new(BufReader::new(file), None)
            .run(&mut interpreter, &mut printer)
            .with_context(|| format!("Failed to evaluate script {}", path.display()))?;
    } else {
        let prompt = repl::wants_prompt(args.format, io::stdin().is_terminal())
            .then(|| config.repl.clone());
        Repl::new(io::stdin().lock(), prompt)
            .run(&mut interpreter, &mut printer)
            .context("Interactive session failed")?;
        return Ok(ExitCode::SUCCESS);
    }

    if printer.error_count() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
