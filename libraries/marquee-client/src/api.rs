//! The catalog operations the query layer depends on.

use crate::client::CatalogClient;
use crate::error::Result;
use async_trait::async_trait;
use marquee_core::{EntriesPage, Entry, EntryFilter, EntryId, EntryInput, Stats};

/// Remote catalog operations.
///
/// Implemented by [`CatalogClient`] over HTTP; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of entries matching `filter`, starting at `offset`.
    async fn list_entries(&self, filter: &EntryFilter, limit: u32, offset: u64)
        -> Result<EntriesPage>;

    async fn create_entry(&self, input: &EntryInput) -> Result<Entry>;

    async fn update_entry(&self, id: &EntryId, input: &EntryInput) -> Result<Entry>;

    async fn delete_entry(&self, id: &EntryId) -> Result<()>;

    async fn stats(&self) -> Result<Stats>;
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_entries(
        &self,
        filter: &EntryFilter,
        limit: u32,
        offset: u64,
    ) -> Result<EntriesPage> {
        self.entries().list(filter, limit, offset).await
    }

    async fn create_entry(&self, input: &EntryInput) -> Result<Entry> {
        self.entries().create(input).await
    }

    async fn update_entry(&self, id: &EntryId, input: &EntryInput) -> Result<Entry> {
        self.entries().update(id, input).await
    }

    async fn delete_entry(&self, id: &EntryId) -> Result<()> {
        self.entries().delete(id).await
    }

    async fn stats(&self) -> Result<Stats> {
        self.entries().stats().await
    }
}
