//! Roadnet command-line entry point.
//!
//! Reads commands from a file or stdin, one per line, and runs them against
//! a single road network.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use roadnet_cli::session::Session;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "roadnet")]
#[command(about = "Maintain a road network and its numbered routes")]
struct Args {
    /// Command file; stdin when absent
    #[arg(value_name = "PATH")]
    input: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a JSON summary of the network after the input is consumed
    #[arg(long)]
    summary: bool,
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("roadnet_core=debug,roadnet_cli=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let mut session = Session::new();
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            session.run(BufReader::new(file), &mut out, &mut err)?;
        }
        None => {
            session.run(io::stdin().lock(), &mut out, &mut err)?;
        }
    }

    if args.summary {
        let summary = serde_json::to_string_pretty(&session.network().summary())
            .context("failed to render network summary")?;
        writeln!(out, "{summary}")?;
    }
    Ok(())
}
