//! Canonical identity key derivation
//!
//! Two records denote the same work iff their canonical identity keys are
//! equal. Identity is a pure function of a record's field values; it never
//! depends on record order, origin file, or prior grouping decisions.

use crate::normalize::{first_author_lastname, normalize_doi, normalize_title, parse_year};
use crate::record::Record;

/// Derive the canonical identity key for a record.
///
/// Three tiers, tried in order and mutually exclusive:
/// 1. `doi:<normalized-doi>` when a DOI field is present and non-empty
/// 2. `tya:<normalized-title>|<year-or-????>|<surname-or-unknown>` when a
///    title is present
/// 3. `key:<lowercased-cite-key>` as a guaranteed-total last resort
pub fn canonical_identity(record: &Record) -> String {
    if let Some(doi) = record.doi().map(str::trim).filter(|s| !s.is_empty()) {
        return format!("doi:{}", normalize_doi(doi));
    }

    if let Some(title) = record.title().filter(|s| !s.is_empty()) {
        let year = parse_year(record.field("year"), record.field("date"));
        let author = first_author_lastname(record.author());
        return format!(
            "tya:{}|{}|{}",
            normalize_title(title),
            year.as_deref().unwrap_or("????"),
            author.as_deref().unwrap_or("unknown")
        );
    }

    format!("key:{}", record.key.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(fields: &[(&str, &str)]) -> Record {
        let mut record = Record::new("TestKey", "article");
        for (name, value) in fields {
            record.add_field(*name, *value);
        }
        record
    }

    #[test]
    fn test_doi_tier_wins_over_title() {
        let record = record_with(&[("doi", "10.1000/XYZ"), ("title", "Some Title")]);
        assert_eq!(canonical_identity(&record), "doi:10.1000/xyz");
    }

    #[test]
    fn test_doi_lookup_is_case_insensitive() {
        let lower = record_with(&[("doi", "10.1000/xyz")]);
        let upper = record_with(&[("DOI", "https://doi.org/10.1000/XYZ.")]);
        assert_eq!(canonical_identity(&lower), canonical_identity(&upper));
    }

    #[test]
    fn test_empty_doi_falls_through_to_title() {
        let record = record_with(&[("doi", "  "), ("title", "A Title"), ("year", "2020")]);
        assert!(canonical_identity(&record).starts_with("tya:"));
    }

    #[test]
    fn test_title_tier_placeholders() {
        let record = record_with(&[("title", "A Title")]);
        assert_eq!(canonical_identity(&record), "tya:a title|????|unknown");
    }

    #[test]
    fn test_title_tier_full() {
        let record = record_with(&[
            ("title", "Deep {L}earning for Cats"),
            ("author", "Smith, John and Doe, Jane"),
            ("year", "2019"),
        ]);
        assert_eq!(
            canonical_identity(&record),
            "tya:deep learning for cats|2019|smith"
        );
    }

    #[test]
    fn test_year_from_date_field() {
        let record = record_with(&[("title", "T"), ("date", "2021-03-01")]);
        assert_eq!(canonical_identity(&record), "tya:t|2021|unknown");
    }

    #[test]
    fn test_key_tier_last_resort() {
        let record = Record::new("MyKey2020", "misc");
        assert_eq!(canonical_identity(&record), "key:mykey2020");
    }

    #[test]
    fn test_empty_title_falls_through_to_key() {
        let record = record_with(&[("title", "")]);
        assert_eq!(canonical_identity(&record), "key:testkey");
    }
}
