//! pyexc - declared-error registry tooling
//!
//! Prints the effective `[tool.pyexc]` configuration of a project and tests
//! paths against its exclude patterns.

use std::{path::PathBuf, process::ExitCode};

use {
    clap::Parser,
    serde_json::to_string_pretty,
    tracing_subscriber::{EnvFilter, fmt},
};

use pyexc::{
    config::{MANIFEST_FILE, PyExcConfig},
    error::{ErrorReporter, Result, ResultExt},
};

#[derive(Parser, Debug)]
#[command(name = "pyexc")]
#[command(about = "Show the effective pyexc configuration and exclusions")]
struct Cli {
    /// Manifest to read; must exist when given.
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Paths to test against the exclude patterns.
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            ErrorReporter::fatal(&error);
            eprintln!("error: {}", ErrorReporter::to_user_message(&error));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.manifest {
        Some(path) => PyExcConfig::try_load_from(path)
            .add_contextf(format!("Loading configuration from {}", path.display()))?,
        None => PyExcConfig::load_from(MANIFEST_FILE),
    };

    println!(
        "{}",
        to_string_pretty(&config).add_context("Serializing configuration")?
    );

    if !cli.paths.is_empty() {
        let matcher = config
            .exclude_matcher()
            .add_context("Compiling exclude patterns")?;
        for path in &cli.paths {
            match matcher.matching_pattern(path) {
                Some(pattern) => println!("excluded {} ({pattern})", path.display()),
                None => println!("included {}", path.display()),
            }
        }
    }

    Ok(())
}
