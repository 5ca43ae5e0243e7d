//! Usage aggregation
//!
//! Runs the marketplace query twice, once by downloads and once by last
//! update, and merges both pages into one deduplicated pool. A plugin seen
//! in both keeps the values of its first occurrence.

use std::collections::HashSet;

use crate::source::ExtensionSource;
use crate::types::{PluginRecord, PluginUsage, SortKey};

/// Query order; earlier queries win on duplicate ids
pub const QUERY_ORDER: [SortKey; 2] = [SortKey::Downloads, SortKey::UpdateDate];

/// Collect the deduplicated usage pool for `extension_point`.
///
/// A failed query contributes nothing; the other one still runs.
pub fn collect<S: ExtensionSource + ?Sized>(source: &S, extension_point: &str) -> Vec<PluginUsage> {
    let pages: Vec<Vec<PluginRecord>> = QUERY_ORDER
        .iter()
        .map(|&sort| match source.fetch_usages(extension_point, sort) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    extension_point,
                    sort = %sort,
                    error = %e,
                    "plugin usage query failed"
                );
                Vec::new()
            }
        })
        .collect();

    merge(pages.iter().flatten())
}

/// Merge records in order, dropping duplicate ids and records without source
pub fn merge<'a>(records: impl IntoIterator<Item = &'a PluginRecord>) -> Vec<PluginUsage> {
    let mut seen = HashSet::new();
    let mut pool = Vec::new();

    for record in records {
        let Some(usage) = PluginUsage::from_record(record) else {
            continue;
        };

        if seen.insert(usage.id.clone()) {
            pool.push(usage);
        }
    }

    tracing::debug!(pool = pool.len(), "merged plugin usages");
    pool
}
