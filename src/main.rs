//! Comment normalizer for the IR generator's C++ sources.
//!
//! For each `.cpp` file, in three passes:
//!
//! 1. **Strip** — drop `//` comments inside function bodies and stray comments
//!    between functions, keeping signatures and documentation blocks
//! 2. **Inject** — add the catalog's canonical comment above each known
//!    definition that has none
//! 3. **Compact** — collapse runs of three or more blank lines
//!
//! `.h` files only get their `//` comments removed. Running the tool again on
//! its own output changes nothing.

mod catalog;
mod compact;
mod discover;
mod error;
mod header;
mod inject;
mod lines;
mod process;
mod split;
mod strip;
mod tracker;

use anyhow::{bail, Result};
use catalog::Catalog;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "irnorm",
    about = "Normalize comments in IR generator C++ sources"
)]
struct Cli {
    /// Files, directories or glob patterns (default: src/ir)
    paths: Vec<String>,

    /// Annotation catalog (TOML). Defaults to the built-in IR generator catalog.
    #[arg(short = 'c', long)]
    catalog: Option<PathBuf>,

    /// Report files that would change without writing them
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    log::debug!(
        "catalog: {} rules, scope {}, return types {:?}",
        catalog.rules().len(),
        catalog.scope().unwrap_or("<any>"),
        catalog.return_types()
    );

    let patterns = if cli.paths.is_empty() {
        vec![discover::DEFAULT_DIR.to_string()]
    } else {
        cli.paths.clone()
    };
    let files = discover::expand_inputs(&patterns)?;
    if files.is_empty() {
        bail!("no input files found");
    }

    let report = process::process_batch(&files, &catalog, !cli.check);
    let failures = report.failures();
    let changed = report.changed();
    println!(
        "\n{} file(s): {} {}, {} failed",
        report.results.len(),
        changed,
        if cli.check { "would change" } else { "rewritten" },
        failures
    );

    if failures > 0 {
        bail!("{failures} file(s) could not be processed");
    }
    if cli.check && changed > 0 {
        bail!("{changed} file(s) need normalization");
    }
    Ok(())
}
