//! Representative election and field-level merging for duplicate groups

use std::collections::HashMap;

use crate::record::Record;

/// Which group member anchors the merged record's cite key and entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeepPolicy {
    /// The member with the highest quality score (stable on ties)
    #[default]
    Best,
    /// The first member in input order
    First,
}

/// Quality score used by [`KeepPolicy::Best`]: the number of non-empty field
/// values, plus one when the entry type is not the generic "misc".
pub(crate) fn quality_score(record: &Record) -> usize {
    let mut score = record
        .fields
        .iter()
        .filter(|f| !f.value.trim().is_empty())
        .count();
    if record.entry_type.to_lowercase() != "misc" {
        score += 1;
    }
    score
}

/// Pick the representative ("kept") member of a group.
///
/// Ties under `Best` go to the earliest member, so election is stable across
/// runs (strict `>` keeps the first maximal element).
pub fn pick_representative(records: &[Record], policy: KeepPolicy) -> &Record {
    assert!(
        !records.is_empty(),
        "pick_representative called with no records"
    );

    match policy {
        KeepPolicy::First => &records[0],
        KeepPolicy::Best => {
            let mut best = &records[0];
            let mut best_score = quality_score(best);
            for record in &records[1..] {
                let score = quality_score(record);
                if score > best_score {
                    best = record;
                    best_score = score;
                }
            }
            best
        }
    }
}

/// Choose one value for a field across group members: the longest non-empty
/// (trimmed) value, ties broken by first occurrence.
fn pick_field_value<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut picked: Option<&str> = None;
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match picked {
            Some(current) if value.chars().count() <= current.chars().count() => {}
            _ => picked = Some(value),
        }
    }
    picked.map(str::to_string)
}

/// Merge a group of records sharing one canonical identity into a single
/// output record.
///
/// The merged record takes its cite key and entry type from the
/// representative. Every field name appearing in any member (compared
/// case-insensitively, emitted in sorted order under its first-seen
/// spelling) gets the longest non-empty value across members; fields empty
/// in all members are omitted. Provenance lists every member's
/// (source path, key, entry type) in input order.
///
/// Calling this with an empty group is a caller defect, not a runtime
/// condition reachable from valid input.
pub fn merge_records(records: &[Record], policy: KeepPolicy) -> Record {
    assert!(!records.is_empty(), "merge_records called with no records");

    let representative = pick_representative(records, policy);
    let mut merged = Record::new(
        representative.key.clone(),
        representative.entry_type.clone(),
    );

    // Union of field names, keyed case-insensitively, first spelling kept.
    let mut spelling: HashMap<String, String> = HashMap::new();
    let mut names: Vec<String> = Vec::new();
    for record in records {
        for field in &record.fields {
            let lower = field.name.to_lowercase();
            if !spelling.contains_key(&lower) {
                spelling.insert(lower.clone(), field.name.clone());
                names.push(lower);
            }
        }
    }
    names.sort();

    for lower in &names {
        let values = records.iter().filter_map(|r| r.field(lower));
        if let Some(value) = pick_field_value(values) {
            merged.add_field(spelling[lower].clone(), value);
        }
    }

    merged.contributors = records.iter().map(Record::as_contributor).collect();
    merged
}
