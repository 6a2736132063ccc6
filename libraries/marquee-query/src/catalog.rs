//! Catalog queries and mutations on top of the caches.
//!
//! Reads go through [`QueryCache`] (stats) and [`InfiniteCache`] (entry
//! pages). Mutations validate their form first, then call the API, and only
//! on success invalidate both the entry lists and the stats.

use crate::cache::{Fetcher, QueryCache, QuerySnapshot};
use crate::error::{QueryError, Result};
use crate::infinite::{InfiniteCache, PageFetcher, PagedSnapshot};
use crate::key::{QueryKey, QueryScope};
use futures_util::FutureExt;
use marquee_client::CatalogApi;
use marquee_core::{EntriesPage, Entry, EntryFilter, EntryForm, EntryId, Stats};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Entries requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query layer for one catalog.
///
/// Cheap to clone; clones share the same caches.
#[derive(Clone)]
pub struct CatalogQueries {
    api: Arc<dyn CatalogApi>,
    stats: QueryCache<Stats>,
    entries: InfiniteCache<EntriesPage>,
    page_size: u32,
}

impl CatalogQueries {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            stats: QueryCache::new(),
            entries: InfiniteCache::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the page size; zero is treated as one.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Stats, from cache when fresh
    pub async fn stats(&self) -> Result<Arc<Stats>> {
        self.stats.fetch(QueryKey::Stats, self.stats_fetcher()).await
    }

    /// Mount a consumer on the stats query
    pub fn watch_stats(&self) -> watch::Receiver<QuerySnapshot<Stats>> {
        self.stats.watch(QueryKey::Stats, self.stats_fetcher())
    }

    /// Mount a consumer on the paged entry list for `filter`
    pub fn subscribe_entries(
        &self,
        filter: &EntryFilter,
    ) -> watch::Receiver<PagedSnapshot<EntriesPage>> {
        self.entries
            .subscribe(entries_key(filter), self.entries_fetcher(filter.clone()))
    }

    /// Request the next page for `filter`; see [`InfiniteCache::fetch_next_page`].
    pub fn fetch_next_page(&self, filter: &EntryFilter) -> bool {
        self.entries.fetch_next_page(&entries_key(filter))
    }

    /// Reload the list for `filter` from its first page
    pub fn refetch_entries(&self, filter: &EntryFilter) -> bool {
        self.entries.refetch(&entries_key(filter))
    }

    /// Forget every page held for `filter`
    pub fn discard_entries(&self, filter: &EntryFilter) {
        self.entries.remove(&entries_key(filter));
    }

    pub fn entries_snapshot(&self, filter: &EntryFilter) -> Option<PagedSnapshot<EntriesPage>> {
        self.entries.snapshot(&entries_key(filter))
    }

    pub fn stats_snapshot(&self) -> Option<QuerySnapshot<Stats>> {
        self.stats.snapshot(&QueryKey::Stats)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Validate `form` and create an entry.
    pub async fn create_entry(&self, form: &EntryForm) -> Result<Entry> {
        let input = form.validate()?;
        let entry = self.api.create_entry(&input).await?;

        info!(id = %entry.id, title = %entry.title, "Entry created");
        self.invalidate_catalog();
        Ok(entry)
    }

    /// Validate `form` and replace entry `id` with it.
    pub async fn update_entry(&self, id: &EntryId, form: &EntryForm) -> Result<Entry> {
        let input = form.validate()?;
        let entry = self.api.update_entry(id, &input).await?;

        info!(id = %entry.id, title = %entry.title, "Entry updated");
        self.invalidate_catalog();
        Ok(entry)
    }

    pub async fn delete_entry(&self, id: &EntryId) -> Result<()> {
        self.api.delete_entry(id).await?;

        info!(id = %id, "Entry deleted");
        self.invalidate_catalog();
        Ok(())
    }

    /// Invalidate matching keys in both caches; returns how many matched.
    pub fn invalidate(&self, predicate: impl Fn(&QueryKey) -> bool) -> usize {
        self.stats.invalidate(&predicate) + self.entries.invalidate(&predicate)
    }

    fn invalidate_catalog(&self) {
        let matched = self.invalidate(|key| {
            QueryScope::Entries.matches(key) || QueryScope::Stats.matches(key)
        });
        debug!(matched, "Invalidated catalog queries");
    }

    fn stats_fetcher(&self) -> Fetcher<Stats> {
        let api = Arc::clone(&self.api);
        Arc::new(move || {
            let api = Arc::clone(&api);
            async move { api.stats().await.map_err(QueryError::from) }.boxed()
        })
    }

    fn entries_fetcher(&self, filter: EntryFilter) -> PageFetcher<EntriesPage> {
        let api = Arc::clone(&self.api);
        let limit = self.page_size;
        Arc::new(move |offset| {
            let api = Arc::clone(&api);
            let filter = filter.clone();
            async move {
                api.list_entries(&filter, limit, offset)
                    .await
                    .map_err(QueryError::from)
            }
            .boxed()
        })
    }
}

impl std::fmt::Debug for CatalogQueries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogQueries")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

fn entries_key(filter: &EntryFilter) -> QueryKey {
    QueryKey::Entries(filter.clone())
}
