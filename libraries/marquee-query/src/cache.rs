//! Point query cache.
//!
//! One slot per [`QueryKey`] holding the last good value, a status, and the
//! fetch currently in flight. Concurrent readers of the same key await the
//! same shared future, so a key never has two requests outstanding.

use crate::error::{QueryError, Result};
use crate::key::{next_generation, QueryKey, QueryStatus};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Produces a fresh request for a key.
pub type Fetcher<V> = Arc<dyn Fn() -> BoxFuture<'static, Result<V>> + Send + Sync>;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<Arc<V>>>>;

/// What subscribers of a point query see
#[derive(Debug)]
pub struct QuerySnapshot<V> {
    /// Last good value; kept across errors and refetches
    pub data: Option<Arc<V>>,
    pub status: QueryStatus,
    pub error: Option<QueryError>,
    pub is_fetching: bool,
    pub is_stale: bool,
}

impl<V> Clone for QuerySnapshot<V> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            status: self.status,
            error: self.error.clone(),
            is_fetching: self.is_fetching,
            is_stale: self.is_stale,
        }
    }
}

impl<V> Default for QuerySnapshot<V> {
    fn default() -> Self {
        Self {
            data: None,
            status: QueryStatus::Idle,
            error: None,
            is_fetching: false,
            is_stale: false,
        }
    }
}

struct Slot<V> {
    data: Option<Arc<V>>,
    status: QueryStatus,
    error: Option<QueryError>,
    stale: bool,
    generation: u64,
    in_flight: Option<SharedFetch<V>>,
    fetcher: Option<Fetcher<V>>,
    tx: watch::Sender<QuerySnapshot<V>>,
}

impl<V> Slot<V> {
    fn new() -> Self {
        let (tx, _) = watch::channel(QuerySnapshot::default());
        Self {
            data: None,
            status: QueryStatus::Idle,
            error: None,
            stale: false,
            generation: 0,
            in_flight: None,
            fetcher: None,
            tx,
        }
    }

    fn needs_fetch(&self) -> bool {
        self.in_flight.is_none() && (self.data.is_none() || self.stale)
    }

    fn snapshot(&self) -> QuerySnapshot<V> {
        QuerySnapshot {
            data: self.data.clone(),
            status: self.status,
            error: self.error.clone(),
            is_fetching: self.in_flight.is_some(),
            is_stale: self.stale,
        }
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }
}

/// Keyed cache of single-value queries.
pub struct QueryCache<V> {
    slots: Arc<Mutex<HashMap<QueryKey, Slot<V>>>>,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<V: Send + Sync + 'static> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + Sync + 'static> QueryCache<V> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Slot<V>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state of `key`, if it was ever used
    pub fn snapshot(&self, key: &QueryKey) -> Option<QuerySnapshot<V>> {
        self.lock().get(key).map(Slot::snapshot)
    }

    /// Cached value if fresh, otherwise the (possibly shared) in-flight fetch.
    pub async fn fetch(&self, key: QueryKey, fetcher: Fetcher<V>) -> Result<Arc<V>> {
        let pending = {
            let mut slots = self.lock();
            let slot = slots.entry(key.clone()).or_insert_with(Slot::new);
            slot.fetcher = Some(Arc::clone(&fetcher));

            if !slot.stale {
                if let Some(data) = &slot.data {
                    debug!(key = ?key, "Cache hit");
                    return Ok(Arc::clone(data));
                }
            }

            match &slot.in_flight {
                Some(in_flight) => {
                    debug!(key = ?key, "Joining in-flight fetch");
                    in_flight.clone()
                }
                None => self.start_fetch(&key, slot, &fetcher),
            }
        };

        pending.await
    }

    /// Mount a consumer on `key`.
    ///
    /// While at least one receiver is alive the key counts as mounted, and
    /// invalidation refetches it right away. Starts a fetch if there is no
    /// fresh data and none is in flight.
    pub fn watch(&self, key: QueryKey, fetcher: Fetcher<V>) -> watch::Receiver<QuerySnapshot<V>> {
        let (rx, pending) = {
            let mut slots = self.lock();
            let slot = slots.entry(key.clone()).or_insert_with(Slot::new);
            slot.fetcher = Some(Arc::clone(&fetcher));

            let pending = slot
                .needs_fetch()
                .then(|| self.start_fetch(&key, slot, &fetcher));
            (slot.tx.subscribe(), pending)
        };

        if let Some(pending) = pending {
            tokio::spawn(async move {
                let _ = pending.await;
            });
        }

        rx
    }

    /// Mark every matching key stale and refetch the mounted ones.
    ///
    /// Any fetch already in flight for a matching key is superseded: its
    /// result still reaches whoever awaits it but is not written to the cache.
    /// Returns the number of keys that matched. Must be called from within a
    /// Tokio runtime.
    pub fn invalidate(&self, predicate: impl Fn(&QueryKey) -> bool) -> usize {
        let mut matched = 0;
        let mut refetches = Vec::new();

        {
            let mut slots = self.lock();
            for (key, slot) in slots.iter_mut().filter(|(key, _)| predicate(key)) {
                matched += 1;
                slot.stale = true;

                match slot.fetcher.clone() {
                    Some(fetcher) if slot.tx.receiver_count() > 0 => {
                        debug!(key = ?key, "Refetching mounted query");
                        refetches.push(self.start_fetch(key, slot, &fetcher));
                    }
                    _ => {
                        slot.in_flight = None;
                        slot.generation = next_generation();
                        if slot.data.is_none() && slot.status == QueryStatus::Loading {
                            slot.status = QueryStatus::Idle;
                        }
                        slot.publish();
                    }
                }
            }
        }

        for pending in refetches {
            tokio::spawn(async move {
                let _ = pending.await;
            });
        }

        matched
    }

    /// Drop everything cached for `key`; late results for it are discarded.
    pub fn remove(&self, key: &QueryKey) {
        self.lock().remove(key);
    }

    fn start_fetch(
        &self,
        key: &QueryKey,
        slot: &mut Slot<V>,
        fetcher: &Fetcher<V>,
    ) -> SharedFetch<V> {
        slot.generation = next_generation();
        let generation = slot.generation;
        let request = fetcher();

        let cache = self.clone();
        let key = key.clone();
        let pending = async move {
            let result = request.await.map(Arc::new);
            cache.complete(&key, generation, &result);
            result
        }
        .boxed()
        .shared();

        if slot.data.is_none() {
            slot.status = QueryStatus::Loading;
        }
        slot.in_flight = Some(pending.clone());
        slot.publish();

        pending
    }

    fn complete(&self, key: &QueryKey, generation: u64, result: &Result<Arc<V>>) {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(key) else {
            debug!(key = ?key, "Discarding result for removed query");
            return;
        };
        if slot.generation != generation {
            debug!(key = ?key, "Discarding superseded result");
            return;
        }

        slot.in_flight = None;
        match result {
            Ok(data) => {
                slot.data = Some(Arc::clone(data));
                slot.error = None;
                slot.status = QueryStatus::Success;
                slot.stale = false;
            }
            Err(e) => {
                warn!(key = ?key, error = %e, "Query failed");
                slot.error = Some(e.clone());
                slot.status = QueryStatus::Error;
                // Stays refetchable on the next explicit read
                slot.stale = true;
            }
        }
        slot.publish();
    }
}
