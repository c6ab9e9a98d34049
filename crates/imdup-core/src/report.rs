//! Audit report document model
//!
//! Pure construction of the JSON-serializable report describing one
//! deduplication pass: unique/group counts, per-group member details, and
//! every record that did not make it into the output (unusable input as
//! reported by the codec, plus duplicate members that were not kept).
//! Serialization and writing belong to the caller.

use serde::Serialize;

use crate::dedup::{DedupResult, DuplicateGroup};
use crate::record::Record;

/// A record the codec excluded before deduplication, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct ExcludedRecord {
    pub reason: String,
    pub source_path: String,
    #[serde(rename = "id")]
    pub key: Option<String>,
    #[serde(rename = "entrytype")]
    pub entry_type: Option<String>,
    pub title: Option<String>,
}

/// Identifying details of one group member, as surfaced in the report
#[derive(Debug, Clone, Serialize)]
pub struct MemberDetail {
    #[serde(rename = "id")]
    pub key: String,
    #[serde(rename = "entrytype")]
    pub entry_type: String,
    pub source_path: Option<String>,
    pub doi: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
}

impl MemberDetail {
    fn from_record(record: &Record) -> Self {
        Self {
            key: record.key.clone(),
            entry_type: record.entry_type.clone(),
            source_path: record.source_path.clone(),
            doi: record.doi().map(str::to_string),
            title: record.title().map(str::to_string),
            year: record
                .field("year")
                .filter(|v| !v.is_empty())
                .or_else(|| record.field("date"))
                .map(str::to_string),
        }
    }
}

/// Reference to the record kept as a group's representative
#[derive(Debug, Clone, Serialize)]
pub struct KeptRef {
    #[serde(rename = "id")]
    pub key: String,
    pub source_path: Option<String>,
}

/// One entry of the report's excluded-record list
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExclusionReport {
    /// Unusable input, excluded by the codec before deduplication
    Unusable(ExcludedRecord),
    /// A duplicate member that was not kept as the representative
    Duplicate {
        reason: String,
        canonical_id: String,
        kept: KeptRef,
        excluded: MemberDetail,
    },
}

/// One duplicate group as surfaced in the report
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub canonical_id: String,
    #[serde(rename = "kept_entry_id")]
    pub kept_key: String,
    pub kept_source_path: Option<String>,
    pub size: usize,
    pub entries: Vec<MemberDetail>,
}

impl GroupReport {
    fn from_group(group: &DuplicateGroup) -> Self {
        Self {
            canonical_id: group.canonical_id.clone(),
            kept_key: group.kept_key.clone(),
            kept_source_path: group.kept_source_path.clone(),
            size: group.members.len(),
            entries: group.members.iter().map(MemberDetail::from_record).collect(),
        }
    }
}

/// The full report document for one deduplication pass
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub unique_count: usize,
    pub duplicate_group_count: usize,
    pub excluded_count: usize,
    pub excluded_entries: Vec<ExclusionReport>,
    pub duplicate_groups: Vec<GroupReport>,
}

/// Build the report document for a deduplication result.
///
/// `excluded` is the codec-supplied list of records that never reached the
/// engine; it is surfaced first, followed by every duplicate member that was
/// not kept as its group's representative.
pub fn build_report(result: &DedupResult, excluded: &[ExcludedRecord]) -> ReportDocument {
    let mut excluded_entries: Vec<ExclusionReport> = excluded
        .iter()
        .cloned()
        .map(ExclusionReport::Unusable)
        .collect();

    for group in &result.duplicate_groups {
        for member in &group.members {
            if member.key == group.kept_key {
                continue;
            }
            excluded_entries.push(ExclusionReport::Duplicate {
                reason: "duplicate".to_string(),
                canonical_id: group.canonical_id.clone(),
                kept: KeptRef {
                    key: group.kept_key.clone(),
                    source_path: group.kept_source_path.clone(),
                },
                excluded: MemberDetail::from_record(member),
            });
        }
    }

    ReportDocument {
        unique_count: result.unique_records.len(),
        duplicate_group_count: result.duplicate_groups.len(),
        excluded_count: excluded_entries.len(),
        excluded_entries,
        duplicate_groups: result
            .duplicate_groups
            .iter()
            .map(GroupReport::from_group)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::{deduplicate, DedupConfig};

    fn record(key: &str, path: &str, fields: &[(&str, &str)]) -> Record {
        let mut r = Record::new(key, "article");
        r.source_path = Some(path.to_string());
        for (name, value) in fields {
            r.add_field(*name, *value);
        }
        r
    }

    fn sample_result() -> DedupResult {
        let records = vec![
            record("A", "a.bib", &[("doi", "10.1/x"), ("title", "Paper"), ("year", "2020")]),
            record("B", "b.bib", &[("doi", "10.1/x")]),
            record("C", "a.bib", &[("doi", "10.1/y")]),
        ];
        deduplicate(records, &DedupConfig::default())
    }

    #[test]
    fn test_report_counts() {
        let result = sample_result();
        let report = build_report(&result, &[]);

        assert_eq!(report.unique_count, 2);
        assert_eq!(report.duplicate_group_count, 1);
        assert_eq!(report.excluded_count, 1);
    }

    #[test]
    fn test_non_kept_members_are_reported_as_duplicates() {
        let result = sample_result();
        let report = build_report(&result, &[]);

        match &report.excluded_entries[0] {
            ExclusionReport::Duplicate {
                reason,
                canonical_id,
                kept,
                excluded,
            } => {
                assert_eq!(reason, "duplicate");
                assert_eq!(canonical_id, "doi:10.1/x");
                assert_eq!(kept.key, "A");
                assert_eq!(excluded.key, "B");
                assert_eq!(excluded.source_path.as_deref(), Some("b.bib"));
            }
            other => panic!("expected duplicate exclusion, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_year_falls_back_to_date() {
        let mut a = record("A", "a.bib", &[("doi", "10.1/x"), ("year", "2020")]);
        a.add_field("title", "T");
        let b = record(
            "B",
            "b.bib",
            &[("doi", "10.1/x"), ("year", ""), ("date", "2021-05-01")],
        );

        let result = deduplicate(vec![a, b], &DedupConfig::default());
        let report = build_report(&result, &[]);

        let entries = &report.duplicate_groups[0].entries;
        assert_eq!(entries[0].year.as_deref(), Some("2020"));
        assert_eq!(entries[1].year.as_deref(), Some("2021-05-01"));
    }

    #[test]
    fn test_codec_exclusions_come_first() {
        let result = sample_result();
        let unusable = ExcludedRecord {
            reason: "missing_id_or_entrytype".to_string(),
            source_path: "broken.bib".to_string(),
            key: None,
            entry_type: Some("article".to_string()),
            title: Some("Orphan".to_string()),
        };

        let report = build_report(&result, &[unusable]);
        assert_eq!(report.excluded_count, 2);
        assert!(matches!(
            report.excluded_entries[0],
            ExclusionReport::Unusable(_)
        ));
    }

    #[test]
    fn test_report_serializes_with_original_field_names() {
        let result = sample_result();
        let report = build_report(&result, &[]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["unique_count"], 2);
        assert_eq!(json["duplicate_groups"][0]["kept_entry_id"], "A");
        assert_eq!(json["duplicate_groups"][0]["size"], 2);
        assert_eq!(json["duplicate_groups"][0]["entries"][1]["id"], "B");
        assert_eq!(
            json["duplicate_groups"][0]["entries"][0]["entrytype"],
            "article"
        );
        assert_eq!(json["excluded_entries"][0]["reason"], "duplicate");
    }
}
