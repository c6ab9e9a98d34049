//! Deduplication orchestration
//!
//! Drives grouping and merging over the full input and produces the final
//! unique-record list plus a structured account of which records were
//! grouped with which. Fully synchronous and deterministic given its input.

use std::collections::HashMap;

use crate::group::group_by_identity;
use crate::merge::{merge_records, pick_representative, KeepPolicy};
use crate::record::Record;

/// Configuration consumed by the deduplication engine
#[derive(Debug, Clone, Copy, Default)]
pub struct DedupConfig {
    /// Which cite key to keep when merging duplicates
    pub prefer_citekey: KeepPolicy,
}

/// All records that shared one canonical identity, kept for audit
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub canonical_id: String,
    pub kept_key: String,
    pub kept_source_path: Option<String>,
    /// Pre-merge member records, in original input order
    pub members: Vec<Record>,
}

/// The outcome of one deduplication pass
#[derive(Debug, Clone)]
pub struct DedupResult {
    /// One record per distinct identity, in first-seen identity order,
    /// with globally unique cite keys
    pub unique_records: Vec<Record>,
    /// Non-singleton identities only, in first-seen identity order
    pub duplicate_groups: Vec<DuplicateGroup>,
}

/// Deduplicate an ordered sequence of records.
///
/// Each identity seen exactly once passes through unchanged; each identity
/// seen more than once is merged into a single record and recorded as a
/// [`DuplicateGroup`]. A final pass renames colliding output cite keys so
/// every emitted record has a unique key.
pub fn deduplicate(records: Vec<Record>, config: &DedupConfig) -> DedupResult {
    let mut unique_records = Vec::new();
    let mut duplicate_groups = Vec::new();

    for (canonical_id, members) in group_by_identity(records) {
        if members.len() == 1 {
            unique_records.extend(members);
            continue;
        }

        let kept = pick_representative(&members, config.prefer_citekey);
        let kept_key = kept.key.clone();
        let kept_source_path = kept.source_path.clone();

        unique_records.push(merge_records(&members, config.prefer_citekey));
        duplicate_groups.push(DuplicateGroup {
            canonical_id,
            kept_key,
            kept_source_path,
            members,
        });
    }

    DedupResult {
        unique_records: disambiguate_keys(unique_records),
        duplicate_groups,
    }
}

/// Rename colliding cite keys in the output list.
///
/// The first occurrence of a base key keeps it unchanged; the n-th
/// subsequent occurrence becomes `<base>_<n+1>`. Pure: returns a new list
/// and never mutates records already handed out.
fn disambiguate_keys(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(records.len());

    for mut record in records {
        let base = match record.key.trim() {
            "" => "entry".to_string(),
            trimmed => trimmed.to_string(),
        };
        let n = seen.get(&base).copied().unwrap_or(0);
        record.key = if n == 0 {
            base.clone()
        } else {
            format!("{}_{}", base, n + 1)
        };
        seen.insert(base, n + 1);
        out.push(record);
    }

    out
}
