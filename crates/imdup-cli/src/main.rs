//! imdup binary
//!
//! Thin wrapper around the library: parse arguments, set up logging, run,
//! print the summary.

use std::process::ExitCode;

use clap::Parser;

use imdup_cli::{run, Cli};

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(summary) => {
            if cli.dry_run {
                println!(
                    "Read {} entries from {} files",
                    summary.read, summary.files
                );
                println!("Unique entries: {}", summary.unique);
                println!("Duplicate groups: {}", summary.duplicate_groups);
            } else {
                println!(
                    "Wrote {} unique entries to {}",
                    summary.unique,
                    cli.output.display()
                );
                if let Some(report) = &cli.report {
                    println!("Wrote duplicate report to {}", report.display());
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("imdup: {err}");
            ExitCode::FAILURE
        }
    }
}
