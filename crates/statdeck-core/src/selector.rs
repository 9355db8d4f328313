//! Selector resolution for chart requests.
//!
//! A selector is either a literal `module_type>name` key or a regular
//! expression searched against composed keys. Every selector is tried both
//! ways; results are merged, deduplicated by identity and ordered by key.

use std::collections::BTreeSet;

use regex::Regex;

use crate::series::{Series, SeriesId};
use crate::store::CounterStore;

/// Substituted when a request names no selectors.
pub const MATCH_ALL: &str = ".*";

impl CounterStore {
    /// Series whose composed key contains a match for `pattern`.
    ///
    /// An invalid pattern matches nothing; callers routinely mix literal
    /// keys with patterns, so this is not an error.
    pub fn find_by_pattern(&self, pattern: &str) -> Vec<&Series> {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => {
                tracing::debug!(pattern, error=%e, "selector is not a valid pattern");
                return Vec::new();
            }
        };
        self.series()
            .filter(|s| re.is_match(&s.key()))
            .collect()
    }

    /// Resolve selectors to an ordered, deduplicated list of series ids.
    ///
    /// Returns `None` when nothing matched.
    pub fn resolve_selectors<S: AsRef<str>>(&self, selectors: &[S]) -> Option<Vec<SeriesId>> {
        let mut pool: BTreeSet<SeriesId> = BTreeSet::new();

        let mut add = |selector: &str| {
            if let Some(id) = SeriesId::parse_key(selector) {
                if let Some(s) = self.get(&id) {
                    pool.insert(s.id().clone());
                }
            }
            for s in self.find_by_pattern(selector) {
                pool.insert(s.id().clone());
            }
        };

        if selectors.is_empty() {
            add(MATCH_ALL);
        } else {
            for selector in selectors {
                add(selector.as_ref());
            }
        }

        if pool.is_empty() {
            return None;
        }

        let mut ids: Vec<SeriesId> = pool.into_iter().collect();
        // stable: ties on the composed key keep identity order
        ids.sort_by_key(SeriesId::key);
        Some(ids)
    }
}
