//! Incremental list controller.
//!
//! Drives the paged entry query for one active filter:
//!
//! ```text
//! Idle -> Loading -> Ready <-> LoadingMore -> ... -> Exhausted
//!            \                     \
//!             +----> Error <--------+
//! ```
//!
//! A next page is requested only when the sentinel becomes visible while the
//! list is `Ready`. Changing the filter drops every page of the old filter
//! and starts over from an empty list.

use crate::catalog::CatalogQueries;
use crate::debounce::Debounced;
use crate::infinite::{FetchKind, PagedSnapshot};
use crate::key::QueryStatus;
use crate::viewport::{ViewportEvent, ViewportSensor};
use marquee_core::{EntriesPage, Entry, EntryFilter};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// Where the list is in its loading lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// First page in flight, nothing to show
    Loading,
    /// Pages shown and more exist
    Ready,
    /// Next page in flight
    LoadingMore,
    /// Everything matching the filter is loaded
    Exhausted,
    /// Last fetch failed; already loaded entries stay visible
    Error(String),
}

/// Everything a renderer needs for one frame of the list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    pub filter: EntryFilter,
    pub state: ListState,
    pub entries: Vec<Entry>,
    /// Matching entries on the server, once a page has arrived
    pub total: Option<u64>,
}

/// Controller for one incrementally loaded entry list.
pub struct ListController {
    queries: CatalogQueries,
    filter: EntryFilter,
    pages: watch::Receiver<PagedSnapshot<EntriesPage>>,
    snapshot: PagedSnapshot<EntriesPage>,
    state: ListState,
}

impl ListController {
    /// Mount the list for `filter` and start loading its first page.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(queries: CatalogQueries, filter: EntryFilter) -> Self {
        let pages = queries.subscribe_entries(&filter);
        let mut controller = Self {
            queries,
            filter,
            pages,
            snapshot: PagedSnapshot::default(),
            state: ListState::Idle,
        };
        controller.sync();
        controller
    }

    pub fn filter(&self) -> &EntryFilter {
        &self.filter
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Entries of every fetched page, in fetch order
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.snapshot.pages.iter().flat_map(|page| page.entries.iter())
    }

    pub fn total(&self) -> Option<u64> {
        self.snapshot.total()
    }

    pub fn view(&self) -> ListView {
        ListView {
            filter: self.filter.clone(),
            state: self.state.clone(),
            entries: self.entries().cloned().collect(),
            total: self.total(),
        }
    }

    /// Switch to `filter`, discarding the old filter's pages.
    ///
    /// Returns `false` if the filter is unchanged.
    pub fn set_filter(&mut self, filter: EntryFilter) -> bool {
        if filter == self.filter {
            return false;
        }

        info!(search = %filter.search, "List filter changed");
        self.queries.discard_entries(&self.filter);
        self.filter = filter;
        self.snapshot = PagedSnapshot::default();
        self.state = ListState::Idle;

        self.pages = self.queries.subscribe_entries(&self.filter);
        self.sync();
        true
    }

    /// React to the sentinel's visibility.
    ///
    /// Returns whether a next-page fetch was started.
    pub fn on_viewport(&mut self, event: ViewportEvent) -> bool {
        if event != ViewportEvent::SentinelVisible || self.state != ListState::Ready {
            return false;
        }

        let started = self.queries.fetch_next_page(&self.filter);
        if started {
            debug!(offset = self.snapshot.fetched_count(), "Loading more entries");
            self.sync();
        }
        started
    }

    /// Retry after a failure: the first page if nothing is current, otherwise
    /// the page that failed.
    pub fn retry(&mut self) -> bool {
        if !matches!(self.state, ListState::Error(_)) {
            return false;
        }

        let started = if self.snapshot.pages.is_empty() || self.snapshot.is_stale {
            self.queries.refetch_entries(&self.filter)
        } else {
            self.queries.fetch_next_page(&self.filter)
        };
        self.sync();
        started
    }

    /// Wait for the list to change and apply it.
    ///
    /// Returns `false` once the underlying query is gone.
    pub async fn changed(&mut self) -> bool {
        if self.pages.changed().await.is_err() {
            return false;
        }
        self.sync();
        true
    }

    /// Pull the latest snapshot and recompute the state.
    pub fn sync(&mut self) {
        self.snapshot = self.pages.borrow_and_update().clone();
        self.state = derive_state(&self.snapshot);
    }

    /// Drive the list from its inputs until any of them closes.
    ///
    /// Settled search text becomes the filter, sentinel events load more,
    /// and each message on `retries` retries a failed fetch. Every change is
    /// published on `view`.
    pub async fn run<S: ViewportSensor>(
        mut self,
        mut search: Debounced<String>,
        mut sensor: S,
        mut retries: mpsc::UnboundedReceiver<()>,
        view: watch::Sender<ListView>,
    ) {
        loop {
            view.send_replace(self.view());

            tokio::select! {
                text = search.changed() => match text {
                    Some(text) => {
                        self.set_filter(EntryFilter::new(text));
                    }
                    None => break,
                },
                event = sensor.next_event() => match event {
                    Some(event) => {
                        self.on_viewport(event);
                    }
                    None => break,
                },
                retry = retries.recv() => match retry {
                    Some(()) => {
                        self.retry();
                    }
                    None => break,
                },
                alive = self.changed() => {
                    if !alive {
                        break;
                    }
                }
            }
        }

        debug!("List controller stopped");
    }
}

impl std::fmt::Debug for ListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("filter", &self.filter)
            .field("state", &self.state)
            .field("fetched", &self.snapshot.fetched_count())
            .finish()
    }
}

fn derive_state(snapshot: &PagedSnapshot<EntriesPage>) -> ListState {
    match snapshot.fetching {
        Some(FetchKind::Next) => return ListState::LoadingMore,
        Some(FetchKind::First) if snapshot.pages.is_empty() => return ListState::Loading,
        _ => {}
    }

    if snapshot.fetching.is_none() && snapshot.status == QueryStatus::Error {
        if let Some(error) = &snapshot.error {
            return ListState::Error(error.to_string());
        }
    }

    if snapshot.pages.is_empty() {
        ListState::Idle
    } else if snapshot.has_next_page() {
        ListState::Ready
    } else {
        ListState::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use marquee_client::ClientError;
    use marquee_core::{EntryId, EntryType};
    use std::sync::Arc;

    fn page(count: usize, total: u64) -> Arc<EntriesPage> {
        let entries = (0..count)
            .map(|i| Entry {
                id: EntryId::new(i.to_string()),
                title: format!("Entry {}", i),
                entry_type: EntryType::Film,
                director: "Someone".to_string(),
                budget: "1000".to_string(),
                location: "LA".to_string(),
                duration: "90 min".to_string(),
                year: "2001".to_string(),
                created_at: String::new(),
            })
            .collect();
        Arc::new(EntriesPage { entries, total })
    }

    fn snapshot(pages: Vec<Arc<EntriesPage>>, fetching: Option<FetchKind>) -> PagedSnapshot<EntriesPage> {
        PagedSnapshot {
            status: if pages.is_empty() {
                QueryStatus::Loading
            } else {
                QueryStatus::Success
            },
            pages,
            fetching,
            ..PagedSnapshot::default()
        }
    }

    #[test]
    fn test_state_progression() {
        assert_eq!(derive_state(&PagedSnapshot::default()), ListState::Idle);
        assert_eq!(
            derive_state(&snapshot(vec![], Some(FetchKind::First))),
            ListState::Loading
        );
        assert_eq!(
            derive_state(&snapshot(vec![page(20, 45)], None)),
            ListState::Ready
        );
        assert_eq!(
            derive_state(&snapshot(vec![page(20, 45)], Some(FetchKind::Next))),
            ListState::LoadingMore
        );
        assert_eq!(
            derive_state(&snapshot(vec![page(20, 45), page(20, 45), page(5, 45)], None)),
            ListState::Exhausted
        );
    }

    #[test]
    fn test_empty_result_is_exhausted() {
        assert_eq!(
            derive_state(&snapshot(vec![page(0, 0)], None)),
            ListState::Exhausted
        );
    }

    #[test]
    fn test_refresh_keeps_showing_pages() {
        assert_eq!(
            derive_state(&snapshot(vec![page(20, 45)], Some(FetchKind::First))),
            ListState::Ready
        );
    }

    #[test]
    fn test_error_carries_message() {
        let mut failed = snapshot(vec![page(20, 45)], None);
        failed.status = QueryStatus::Error;
        failed.error = Some(QueryError::from(ClientError::Api {
            status: 500,
            message: "Database unavailable".to_string(),
        }));

        assert_eq!(
            derive_state(&failed),
            ListState::Error("Database unavailable".to_string())
        );
    }
}
