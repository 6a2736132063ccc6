//! Paged ("infinite") query cache.
//!
//! A key accumulates pages in fetch order. The next offset is the number of
//! items fetched so far, and a next page exists while that count is below the
//! total reported by the most recent page. At most one fetch per key is in
//! flight; requests made while one is outstanding are no-ops.

use crate::error::{QueryError, Result};
use crate::key::{next_generation, QueryKey, QueryStatus};
use futures_util::future::BoxFuture;
use marquee_core::EntriesPage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

/// A page that knows its own size and the authoritative total.
pub trait Paged: Send + Sync + 'static {
    fn item_count(&self) -> usize;
    fn total(&self) -> u64;
}

impl Paged for EntriesPage {
    fn item_count(&self) -> usize {
        self.entries.len()
    }

    fn total(&self) -> u64 {
        self.total
    }
}

/// Produces a request for the page starting at the given offset.
pub type PageFetcher<P> = Arc<dyn Fn(u64) -> BoxFuture<'static, Result<P>> + Send + Sync>;

/// Which fetch a key is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Offset 0; replaces all pages on success
    First,
    /// Continuation; appended on success
    Next,
}

/// What subscribers of a paged query see
#[derive(Debug)]
pub struct PagedSnapshot<P> {
    pub pages: Vec<Arc<P>>,
    pub status: QueryStatus,
    pub error: Option<QueryError>,
    pub fetching: Option<FetchKind>,
    pub is_stale: bool,
}

impl<P> Clone for PagedSnapshot<P> {
    fn clone(&self) -> Self {
        Self {
            pages: self.pages.clone(),
            status: self.status,
            error: self.error.clone(),
            fetching: self.fetching,
            is_stale: self.is_stale,
        }
    }
}

impl<P> Default for PagedSnapshot<P> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            status: QueryStatus::Idle,
            error: None,
            fetching: None,
            is_stale: false,
        }
    }
}

impl<P: Paged> PagedSnapshot<P> {
    /// Items fetched across all pages
    pub fn fetched_count(&self) -> u64 {
        self.pages.iter().map(|p| p.item_count() as u64).sum()
    }

    /// Total reported by the most recent page
    pub fn total(&self) -> Option<u64> {
        self.pages.last().map(|p| p.total())
    }

    /// Whether another page exists past what is fetched.
    ///
    /// An empty trailing page ends the sequence even if the reported total
    /// says otherwise.
    pub fn has_next_page(&self) -> bool {
        match self.pages.last() {
            Some(last) => last.item_count() > 0 && self.fetched_count() < last.total(),
            None => false,
        }
    }

    /// Offset of the next page, if there is one
    pub fn next_offset(&self) -> Option<u64> {
        self.has_next_page().then(|| self.fetched_count())
    }
}

struct PagedSlot<P> {
    pages: Vec<Arc<P>>,
    status: QueryStatus,
    error: Option<QueryError>,
    stale: bool,
    generation: u64,
    fetching: Option<FetchKind>,
    fetcher: PageFetcher<P>,
    tx: watch::Sender<PagedSnapshot<P>>,
}

impl<P: Paged> PagedSlot<P> {
    fn new(fetcher: PageFetcher<P>) -> Self {
        let (tx, _) = watch::channel(PagedSnapshot::default());
        Self {
            pages: Vec::new(),
            status: QueryStatus::Idle,
            error: None,
            stale: false,
            generation: 0,
            fetching: None,
            fetcher,
            tx,
        }
    }

    fn snapshot(&self) -> PagedSnapshot<P> {
        PagedSnapshot {
            pages: self.pages.clone(),
            status: self.status,
            error: self.error.clone(),
            fetching: self.fetching,
            is_stale: self.stale,
        }
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }
}

/// Keyed cache of paged queries.
pub struct InfiniteCache<P> {
    slots: Arc<Mutex<HashMap<QueryKey, PagedSlot<P>>>>,
}

impl<P> Clone for InfiniteCache<P> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<P: Paged> Default for InfiniteCache<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Paged> InfiniteCache<P> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, PagedSlot<P>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self, key: &QueryKey) -> Option<PagedSnapshot<P>> {
        self.lock().get(key).map(PagedSlot::snapshot)
    }

    /// Mount a consumer on `key`, fetching the first page if needed.
    ///
    /// A first-page fetch starts when the key has no pages or is stale and
    /// nothing is in flight; a consumer joining an in-flight fetch just waits
    /// for it. Must be called from within a Tokio runtime.
    pub fn subscribe(
        &self,
        key: QueryKey,
        fetcher: PageFetcher<P>,
    ) -> watch::Receiver<PagedSnapshot<P>> {
        let mut slots = self.lock();
        let slot = slots
            .entry(key.clone())
            .or_insert_with(|| PagedSlot::new(Arc::clone(&fetcher)));
        slot.fetcher = fetcher;

        if slot.fetching.is_none() && (slot.pages.is_empty() || slot.stale) {
            self.start(&key, slot, FetchKind::First, 0);
        }

        slot.tx.subscribe()
    }

    /// Request the page after the last fetched one.
    ///
    /// Returns `false` without doing anything when the key is unknown, a fetch
    /// for it is already in flight, or no next page exists.
    pub fn fetch_next_page(&self, key: &QueryKey) -> bool {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(key) else {
            return false;
        };

        if slot.fetching.is_some() {
            debug!(key = ?key, "Next page requested while a fetch is in flight");
            return false;
        }

        match slot.snapshot().next_offset() {
            Some(offset) => {
                self.start(key, slot, FetchKind::Next, offset);
                true
            }
            None => false,
        }
    }

    /// Refetch `key` from offset 0, superseding anything in flight.
    ///
    /// Pages already held stay visible until the new first page lands.
    pub fn refetch(&self, key: &QueryKey) -> bool {
        let mut slots = self.lock();
        match slots.get_mut(key) {
            Some(slot) => {
                self.start(key, slot, FetchKind::First, 0);
                true
            }
            None => false,
        }
    }

    /// Mark every matching key stale; mounted keys restart from offset 0.
    ///
    /// Returns the number of keys that matched.
    pub fn invalidate(&self, predicate: impl Fn(&QueryKey) -> bool) -> usize {
        let mut matched = 0;
        let mut slots = self.lock();

        for (key, slot) in slots.iter_mut().filter(|(key, _)| predicate(key)) {
            matched += 1;
            slot.stale = true;

            if slot.tx.receiver_count() > 0 {
                debug!(key = ?key, "Restarting mounted paged query");
                self.start(key, slot, FetchKind::First, 0);
            } else {
                slot.fetching = None;
                slot.generation = next_generation();
                slot.publish();
            }
        }

        matched
    }

    /// Discard every page of `key`; late results for it are dropped.
    pub fn remove(&self, key: &QueryKey) {
        if self.lock().remove(key).is_some() {
            debug!(key = ?key, "Discarded paged query");
        }
    }

    fn start(&self, key: &QueryKey, slot: &mut PagedSlot<P>, kind: FetchKind, offset: u64) {
        slot.generation = next_generation();
        let generation = slot.generation;

        slot.fetching = Some(kind);
        if slot.pages.is_empty() {
            slot.status = QueryStatus::Loading;
        }
        slot.publish();

        debug!(key = ?key, kind = ?kind, offset, "Fetching page");

        let request = (slot.fetcher)(offset);
        let cache = self.clone();
        let key = key.clone();
        tokio::spawn(async move {
            let result = request.await;
            cache.complete(&key, generation, kind, result);
        });
    }

    fn complete(&self, key: &QueryKey, generation: u64, kind: FetchKind, result: Result<P>) {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(key) else {
            debug!(key = ?key, "Discarding page for removed query");
            return;
        };
        if slot.generation != generation {
            debug!(key = ?key, "Discarding superseded page");
            return;
        }

        slot.fetching = None;
        match result {
            Ok(page) => {
                let page = Arc::new(page);
                match kind {
                    FetchKind::First => {
                        slot.pages = vec![page];
                        slot.stale = false;
                    }
                    FetchKind::Next => slot.pages.push(page),
                }
                slot.status = QueryStatus::Success;
                slot.error = None;
            }
            Err(e) => {
                warn!(key = ?key, kind = ?kind, error = %e, "Page fetch failed");
                slot.status = QueryStatus::Error;
                slot.error = Some(e);
            }
        }
        slot.publish();
    }
}
