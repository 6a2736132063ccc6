//! Marquee Query
//!
//! Client-side data layer for the catalog:
//!
//! - **Caching**: keyed point queries with shared in-flight fetches, and
//!   paged queries that accumulate pages per filter
//! - **Invalidation**: predicate-based; mounted queries refetch right away
//! - **Mutations**: validated create, update and delete that invalidate the
//!   entry lists and stats on success
//! - **Debounce**: settle fast-changing input such as search text
//! - **List controller**: incremental loading driven by viewport events
//!
//! # Example
//!
//! ```ignore
//! use marquee_query::{CatalogQueries, ListController};
//! use marquee_core::EntryFilter;
//! use std::sync::Arc;
//!
//! let queries = CatalogQueries::new(Arc::new(client));
//! let mut list = ListController::new(queries.clone(), EntryFilter::default());
//! while list.changed().await {
//!     println!("{:?}: {} entries", list.state(), list.entries().count());
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod infinite;
pub mod key;
pub mod viewport;

pub use cache::{Fetcher, QueryCache, QuerySnapshot};
pub use catalog::{CatalogQueries, DEFAULT_PAGE_SIZE};
pub use controller::{ListController, ListState, ListView};
pub use debounce::{Debounced, DEFAULT_DEBOUNCE_MS};
pub use error::{QueryError, Result};
pub use infinite::{FetchKind, InfiniteCache, PageFetcher, Paged, PagedSnapshot};
pub use key::{QueryKey, QueryScope, QueryStatus};
pub use viewport::{ViewportEvent, ViewportSensor};
