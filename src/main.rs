use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use actiondoc::sync::{DocBlockSync, SyncOutcome};
use actiondoc::Config;

/// Keep IDE-helper `@method` annotations on action classes up to date.
#[derive(Debug, Parser)]
#[command(name = "actiondoc", version, about)]
struct Cli {
    /// Project root containing composer.json.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// The namespace to scan for action classes.
    #[arg(long, default_value = "App")]
    namespace: String,

    /// Show what would change without modifying files.
    #[arg(long)]
    dry_run: bool,

    /// Configuration file to use instead of `<root>/actiondoc.toml`.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("project root {} not found", cli.root.display()))?;

    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load(&root)
            .with_context(|| format!("invalid {}", actiondoc::config::CONFIG_FILE))?,
    };

    println!("Scanning for action classes in namespace: {}", cli.namespace);

    let mut sync = DocBlockSync::new(root, config);
    let outcomes = sync.sync_namespace(&cli.namespace, cli.dry_run);

    if outcomes.is_empty() {
        eprintln!("No action classes found in namespace: {}", cli.namespace);
        return Ok(ExitCode::FAILURE);
    }

    let mut updated = 0usize;
    let mut unchanged = 0usize;

    for (fqn, outcome) in &outcomes {
        match outcome {
            SyncOutcome::Diff(entries) if entries.is_empty() => {
                unchanged += 1;
            }
            SyncOutcome::Diff(entries) => {
                updated += 1;
                println!("Would update: {fqn}");
                for entry in entries {
                    println!("    {} {}", entry.kind.symbol(), entry.line);
                }
            }
            SyncOutcome::Updated(true) => {
                updated += 1;
                println!("Updated: {fqn}");
            }
            SyncOutcome::Updated(false) => {
                unchanged += 1;
            }
        }
    }

    println!();
    println!("Summary:");
    let action = if cli.dry_run { "Would be updated" } else { "Updated" };
    println!("  {action}: {updated} classes");
    println!("  Up to date: {unchanged} classes");

    Ok(ExitCode::SUCCESS)
}
