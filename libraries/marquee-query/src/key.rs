//! Typed cache keys.

use marquee_core::EntryFilter;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one cached query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Paged entry list for one filter; its pages live inside the one slot
    Entries(EntryFilter),
    /// Catalog-wide counts
    Stats,
}

/// Endpoint family of a key, used by invalidation predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryScope {
    Entries,
    Stats,
}

impl QueryKey {
    pub fn scope(&self) -> QueryScope {
        match self {
            QueryKey::Entries(_) => QueryScope::Entries,
            QueryKey::Stats => QueryScope::Stats,
        }
    }
}

impl QueryScope {
    pub fn matches(self, key: &QueryKey) -> bool {
        key.scope() == self
    }
}

/// Lifecycle of a cached query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched
    #[default]
    Idle,
    /// First fetch in progress, no data yet
    Loading,
    /// Last fetch succeeded
    Success,
    /// Last fetch failed; earlier data, if any, is kept
    Error,
}

static GENERATION: AtomicU64 = AtomicU64::new(1);

/// Process-unique fetch generation.
///
/// A fetch result is applied only if its slot still carries the generation
/// the fetch was started with, so results for invalidated or removed keys are
/// dropped even when a key is re-created later.
pub(crate) fn next_generation() -> u64 {
    GENERATION.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_matching() {
        let entries = QueryKey::Entries(EntryFilter::new("Inc"));
        assert!(QueryScope::Entries.matches(&entries));
        assert!(!QueryScope::Stats.matches(&entries));
        assert!(QueryScope::Stats.matches(&QueryKey::Stats));
    }

    #[test]
    fn test_generations_increase() {
        let a = next_generation();
        let b = next_generation();
        assert!(b > a);
    }
}
