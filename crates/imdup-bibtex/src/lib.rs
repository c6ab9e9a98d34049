//! BibTeX reading and writing
//!
//! The codec side of the imdup suite: a nom-based parser tolerant of
//! malformed input (it skips what it cannot parse and reports why), a
//! formatter for writing deduplicated records back out, and file-level
//! read/write helpers that tag every record with its origin path and
//! surface unusable records as exclusions.
//!
//! Features:
//! - @string definitions with # concatenation
//! - @comment and @preamble sections
//! - Braced, quoted, and bare numeric field values with nested braces
//! - Per-entry error recovery with line numbers

mod formatter;
mod io;
pub mod parser;

pub use formatter::{format_record, format_records};
pub use io::{read_bib_file, read_bib_files, write_bib_file, BibError};
pub use parser::{parse, ParseIssue, ParseOutcome};
