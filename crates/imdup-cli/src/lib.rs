//! Command-line front end for BibTeX deduplication
//!
//! Reads one or more .bib files, merges duplicate records into one unique
//! union, writes the result, and optionally writes a JSON report of every
//! merge decision.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;

use imdup_bibtex::{read_bib_files, write_bib_file, BibError};
use imdup_core::{build_report, deduplicate, DedupConfig, KeepPolicy};

/// Deduplicate and merge multiple BibTeX files into one unique union
#[derive(Debug, Parser)]
#[command(name = "imdup", version, about)]
pub struct Cli {
    /// Input .bib files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output .bib file
    #[arg(short, long)]
    pub output: PathBuf,

    /// When merging duplicates, which citekey to keep
    #[arg(long, value_enum, default_value_t = CitekeyPolicy::Best)]
    pub prefer_citekey: CitekeyPolicy,

    /// Optional path to write a JSON report of duplicates
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Do not write output; just print summary stats
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CitekeyPolicy {
    Best,
    First,
}

impl std::fmt::Display for CitekeyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CitekeyPolicy::Best => f.write_str("best"),
            CitekeyPolicy::First => f.write_str("first"),
        }
    }
}

impl From<CitekeyPolicy> for KeepPolicy {
    fn from(policy: CitekeyPolicy) -> Self {
        match policy {
            CitekeyPolicy::Best => KeepPolicy::Best,
            CitekeyPolicy::First => KeepPolicy::First,
        }
    }
}

/// Counts reported after a run
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub read: usize,
    pub files: usize,
    pub unique: usize,
    pub duplicate_groups: usize,
    pub excluded: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Bib(#[from] BibError),
    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
    #[error("failed to write report {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Run the deduplication pipeline for the given arguments.
pub fn run(cli: &Cli) -> Result<Summary, CliError> {
    let (records, excluded) = read_bib_files(&cli.inputs)?;
    info!(
        records = records.len(),
        excluded = excluded.len(),
        files = cli.inputs.len(),
        "read input files"
    );

    let config = DedupConfig {
        prefer_citekey: cli.prefer_citekey.into(),
    };
    let read = records.len();
    let result = deduplicate(records, &config);

    let summary = Summary {
        read,
        files: cli.inputs.len(),
        unique: result.unique_records.len(),
        duplicate_groups: result.duplicate_groups.len(),
        excluded: excluded.len(),
    };

    if cli.dry_run {
        return Ok(summary);
    }

    write_bib_file(&cli.output, &result.unique_records)?;
    info!(path = %cli.output.display(), unique = summary.unique, "wrote output");

    if let Some(report_path) = &cli.report {
        let report = build_report(&result, &excluded);
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        fs::write(report_path, json).map_err(|source| CliError::ReportWrite {
            path: report_path.clone(),
            source,
        })?;
        info!(path = %report_path.display(), "wrote duplicate report");
    }

    Ok(summary)
}
