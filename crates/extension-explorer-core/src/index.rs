//! Extension point index
//!
//! Snapshot of the registry's extension point names, fetched fresh on
//! every call. Fetch failures yield an empty snapshot.

use std::collections::BTreeSet;

use crate::source::ExtensionSource;

/// Fetch the full set of extension point names.
///
/// Duplicates collapse and empty names are skipped. Any fetch or parse
/// failure is logged and returns an empty set.
pub fn fetch_all<S: ExtensionSource + ?Sized>(source: &S) -> BTreeSet<String> {
    let records = match source.fetch_index() {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, remote = e.is_remote(), "extension point index unavailable");
            return BTreeSet::new();
        }
    };

    let names: BTreeSet<String> = records
        .into_iter()
        .filter_map(|r| r.implementation_name)
        .filter(|name| !name.trim().is_empty())
        .collect();

    tracing::debug!(count = names.len(), "loaded extension point index");
    names
}

/// Names containing `query`, compared case-insensitively.
///
/// Blank queries are rejected by the caller; here an empty query matches everything.
pub fn search<S: ExtensionSource + ?Sized>(source: &S, query: &str) -> BTreeSet<String> {
    filter(fetch_all(source), query)
}

/// Case-insensitive substring filter over an index snapshot
pub fn filter(names: BTreeSet<String>, query: &str) -> BTreeSet<String> {
    let query_lower = query.to_lowercase();

    names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&query_lower))
        .collect()
}

/// Index entry equal to `name` ignoring case, if any
pub fn find<'a>(names: &'a BTreeSet<String>, name: &str) -> Option<&'a str> {
    let name_lower = name.to_lowercase();

    names
        .iter()
        .find(|candidate| candidate.to_lowercase() == name_lower)
        .map(String::as_str)
}
