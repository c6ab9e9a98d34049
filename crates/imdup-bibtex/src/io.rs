//! File-level reading and writing of BibTeX sources
//!
//! Every record is tagged with the path it came from; input the parser had
//! to skip is surfaced as [`ExcludedRecord`]s rather than failing the whole
//! file. Only real I/O failures are errors.

use std::fs;
use std::path::{Path, PathBuf};

use imdup_core::{ExcludedRecord, Record};

use crate::parser;

/// Codec error
#[derive(Debug, thiserror::Error)]
pub enum BibError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read one BibTeX file into records tagged with their origin path.
///
/// Invalid UTF-8 is replaced rather than rejected; unparseable chunks become
/// exclusions with reason `"parse_error"`.
pub fn read_bib_file(path: &Path) -> Result<(Vec<Record>, Vec<ExcludedRecord>), BibError> {
    let bytes = fs::read(path).map_err(|source| BibError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let source_path = path.display().to_string();

    let outcome = parser::parse(&text);

    let records = outcome
        .records
        .into_iter()
        .map(|mut record| {
            record.source_path = Some(source_path.clone());
            record
        })
        .collect();

    let excluded = outcome
        .issues
        .into_iter()
        .map(|_issue| ExcludedRecord {
            reason: "parse_error".to_string(),
            source_path: source_path.clone(),
            key: None,
            entry_type: None,
            title: None,
        })
        .collect();

    Ok((records, excluded))
}

/// Read multiple BibTeX files, concatenating records and exclusions in
/// argument order.
pub fn read_bib_files(paths: &[PathBuf]) -> Result<(Vec<Record>, Vec<ExcludedRecord>), BibError> {
    let mut all_records = Vec::new();
    let mut all_excluded = Vec::new();

    for path in paths {
        let (records, excluded) = read_bib_file(path)?;
        all_records.extend(records);
        all_excluded.extend(excluded);
    }

    Ok((all_records, all_excluded))
}

/// Write records as a BibTeX file
pub fn write_bib_file(path: &Path, records: &[Record]) -> Result<(), BibError> {
    let text = crate::formatter::format_records(records);
    fs::write(path, text).map_err(|source| BibError::Write {
        path: path.to_path_buf(),
        source,
    })
}
