//! Order-preserving grouping of records by canonical identity

use std::collections::HashMap;

use crate::identity::canonical_identity;
use crate::record::Record;

/// Partition records into identity-keyed buckets in a single pass.
///
/// The returned list holds one `(identity, members)` pair per distinct
/// identity, in the order each identity was first encountered; members keep
/// their original input order. Both orderings are what make the final output
/// reproducible.
pub fn group_by_identity(records: Vec<Record>) -> Vec<(String, Vec<Record>)> {
    let mut buckets: Vec<(String, Vec<Record>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let identity = canonical_identity(&record);
        match index.get(&identity) {
            Some(&pos) => buckets[pos].1.push(record),
            None => {
                index.insert(identity.clone(), buckets.len());
                buckets.push((identity, vec![record]));
            }
        }
    }

    buckets
}
