//! Diversified selection
//!
//! Picks a bounded result set from the usage pool that is balanced across
//! popularity, recency and vendor trust instead of a single top-N sort.
//! Stages run in order; each one only sees plugins no earlier stage took.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::PluginUsage;

/// Per-stage caps for [`diversify`]
///
/// The default magnitudes are carried over for output compatibility; they
/// are not derived from anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    /// Most downloaded
    pub popular: usize,
    /// Most recently updated
    pub recent: usize,
    /// Most downloaded among verified vendors
    pub verified: usize,
    /// Upper bound on the whole result; leftover slots are filled by downloads
    pub max_results: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            popular: 3,
            recent: 3,
            verified: 3,
            max_results: 13,
        }
    }
}

/// Running selection state shared by the stages
struct Selection<'a> {
    pool: &'a [PluginUsage],
    taken: HashSet<&'a str>,
    picked: Vec<&'a PluginUsage>,
    max_results: usize,
}

impl<'a> Selection<'a> {
    fn new(pool: &'a [PluginUsage], max_results: usize) -> Self {
        Self {
            pool,
            taken: HashSet::new(),
            picked: Vec::new(),
            max_results,
        }
    }

    /// Pool entries no stage has taken yet, in pool order
    fn remaining(&self) -> Vec<&'a PluginUsage> {
        self.pool
            .iter()
            .filter(|p| !self.taken.contains(p.id.as_str()))
            .collect()
    }

    /// Take up to `limit` candidates, already sorted by the stage's key
    fn take(&mut self, candidates: Vec<&'a PluginUsage>, limit: usize) {
        let room = self.max_results.saturating_sub(self.picked.len());

        for usage in candidates.into_iter().take(limit.min(room)) {
            if self.taken.insert(usage.id.as_str()) {
                self.picked.push(usage);
            }
        }
    }

    fn free_slots(&self) -> usize {
        self.max_results.saturating_sub(self.picked.len())
    }
}

/// Sort by downloads, highest first. `sort_by` is stable, so ties keep pool order.
fn by_downloads(mut usages: Vec<&PluginUsage>) -> Vec<&PluginUsage> {
    usages.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    usages
}

fn by_last_update(mut usages: Vec<&PluginUsage>) -> Vec<&PluginUsage> {
    usages.sort_by(|a, b| b.last_update_date.cmp(&a.last_update_date));
    usages
}

/// Select a diversified, duplicate-free subset of `pool`.
///
/// Output is the concatenation of the popularity, recency, verified and
/// fill stages, each in its own sort order. Deterministic for a fixed pool.
pub fn diversify(pool: &[PluginUsage], policy: &SelectionPolicy) -> Vec<PluginUsage> {
    let mut selection = Selection::new(pool, policy.max_results);

    let popular = by_downloads(selection.remaining());
    selection.take(popular, policy.popular);

    let recent = by_last_update(selection.remaining());
    selection.take(recent, policy.recent);

    let verified = by_downloads(
        selection
            .remaining()
            .into_iter()
            .filter(|p| p.verified)
            .collect(),
    );
    selection.take(verified, policy.verified);

    let slots = selection.free_slots();
    if slots > 0 {
        let fill = by_downloads(selection.remaining());
        selection.take(fill, slots);
    }

    tracing::debug!(
        pool = pool.len(),
        selected = selection.picked.len(),
        "diversified plugin usages"
    );

    selection.picked.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(id: &str, downloads: u64, updated: i64, verified: bool) -> PluginUsage {
        PluginUsage {
            id: id.to_string(),
            name: format!("plugin-{}", id),
            downloads,
            source_code_url: format!("https://github.com/acme/{}", id),
            verified,
            last_update_date: updated,
        }
    }

    fn ids(usages: &[PluginUsage]) -> Vec<&str> {
        usages.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_popular_stage_takes_top_three() {
        // downloads 1..=20, update date inverse so recency picks low downloads
        let pool: Vec<PluginUsage> = (1..=20)
            .map(|d| usage(&format!("p{}", d), d, 100 - d as i64, false))
            .collect();

        let result = diversify(&pool, &SelectionPolicy::default());

        assert_eq!(ids(&result[..3]), vec!["p20", "p19", "p18"]);
        assert_eq!(ids(&result[3..6]), vec!["p1", "p2", "p3"]);
        assert_eq!(result.len(), 13);

        let unique: HashSet<&str> = result.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(unique.len(), result.len());
    }

    #[test]
    fn test_stage_order() {
        let pool = vec![
            usage("popular-a", 1000, 1, false),
            usage("popular-b", 900, 2, false),
            usage("popular-c", 800, 3, false),
            usage("fresh", 10, 500, false),
            usage("trusted", 50, 4, true),
            usage("filler", 100, 5, false),
        ];

        let result = diversify(&pool, &SelectionPolicy::default());

        assert_eq!(
            ids(&result),
            vec!["popular-a", "popular-b", "popular-c", "fresh", "filler", "trusted"]
        );
    }

    #[test]
    fn test_verified_stage() {
        let policy = SelectionPolicy {
            popular: 1,
            recent: 1,
            verified: 2,
            max_results: 4,
        };
        let pool = vec![
            usage("top", 1000, 1, false),
            usage("new", 1, 900, false),
            usage("v-small", 5, 2, true),
            usage("big", 500, 3, false),
            usage("v-large", 50, 4, true),
        ];

        let result = diversify(&pool, &policy);

        assert_eq!(ids(&result), vec!["top", "new", "v-large", "v-small"]);
    }

    #[test]
    fn test_small_pool() {
        let pool = vec![usage("a", 1, 1, false), usage("b", 2, 2, true)];

        let result = diversify(&pool, &SelectionPolicy::default());

        assert_eq!(ids(&result), vec!["b", "a"]);
    }

    #[test]
    fn test_empty_pool() {
        assert!(diversify(&[], &SelectionPolicy::default()).is_empty());
    }

    #[test]
    fn test_ties_keep_pool_order() {
        let pool = vec![
            usage("first", 10, 0, false),
            usage("second", 10, 0, false),
            usage("third", 10, 0, false),
            usage("fourth", 10, 0, false),
        ];

        let result = diversify(&pool, &SelectionPolicy::default());

        assert_eq!(ids(&result), vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn test_max_results_caps_early_stages() {
        let policy = SelectionPolicy {
            max_results: 2,
            ..Default::default()
        };
        let pool: Vec<PluginUsage> = (1..=10)
            .map(|d| usage(&format!("p{}", d), d, d as i64, true))
            .collect();

        let result = diversify(&pool, &policy);

        assert_eq!(ids(&result), vec!["p10", "p9"]);
    }

    #[test]
    fn test_deterministic() {
        let pool: Vec<PluginUsage> = (0..30)
            .map(|i| usage(&format!("p{}", i), (i * 7 % 11) as u64, (i * 3 % 5) as i64, i % 2 == 0))
            .collect();

        let policy = SelectionPolicy::default();
        assert_eq!(diversify(&pool, &policy), diversify(&pool, &policy));
    }
}
