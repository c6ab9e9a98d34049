//! BibTeX formatting
//!
//! Converts records back to BibTeX text. Provenance never appears here: it
//! lives outside the field map by construction, so only real fields are
//! written.

use imdup_core::Record;

/// Format a single record as a BibTeX entry
pub fn format_record(record: &Record) -> String {
    let mut out = String::new();

    out.push('@');
    out.push_str(&record.entry_type);
    out.push('{');
    out.push_str(&record.key);
    out.push_str(",\n");

    for field in &record.fields {
        out.push_str("  ");
        out.push_str(&field.name);
        out.push_str(" = ");
        out.push_str(&format_value(&field.value));
        out.push_str(",\n");
    }

    out.push('}');
    out
}

/// Format multiple records separated by blank lines, with a trailing newline
pub fn format_records(records: &[Record]) -> String {
    let mut out = records
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Bare numbers stay unbraced; everything else is wrapped in braces, which
/// preserves LaTeX commands and capitalization.
fn format_value(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }
    format!("{{{}}}", value)
}
