//! imdup-core: bibliographic record deduplication engine
//!
//! This library decides which bibliographic records refer to the same work,
//! merges each such cluster into one canonical record, and keeps the merge
//! decisions auditable:
//! - Field normalization (whitespace, DOI, title, year, author surname)
//! - Canonical identity key derivation
//! - Order-preserving grouping by identity
//! - Representative election and field-level merging
//! - Output cite-key disambiguation
//! - Audit report document model
//!
//! The engine is a pure, single-pass batch computation over in-memory
//! records: no I/O, no shared state between invocations. Parsing and
//! serialization of BibTeX text live in `imdup-bibtex`.

pub mod dedup;
pub mod group;
pub mod identity;
pub mod merge;
pub mod normalize;
pub mod record;
pub mod report;

// Re-export main types for convenience
pub use dedup::{deduplicate, DedupConfig, DedupResult, DuplicateGroup};
pub use identity::canonical_identity;
pub use merge::{merge_records, KeepPolicy};
pub use record::{Contributor, Field, Record};
pub use report::{build_report, ExcludedRecord, ReportDocument};
