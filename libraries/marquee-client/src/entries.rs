//! Catalog endpoints: entries and stats.

use crate::error::Result;
use crate::request::{endpoint, entry_endpoint, read_json, send};
use crate::types::UnauthorizedBehavior;
use marquee_core::{EntriesPage, Entry, EntryFilter, EntryId, EntryInput, Stats};
use reqwest::{Client, Method};
use tracing::debug;

/// Entries client for the catalog API.
pub struct EntriesClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    token: Option<String>,
}

impl<'a> EntriesClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, token: Option<String>) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Fetch one page of entries matching `filter`.
    ///
    /// `search` is only sent when the filter has search text.
    pub async fn list(&self, filter: &EntryFilter, limit: u32, offset: u64) -> Result<EntriesPage> {
        let mut url = endpoint(self.base_url, "/entries")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            if filter.has_search() {
                query.append_pair("search", &filter.search);
            }
            query.append_pair("offset", &offset.to_string());
        }

        debug!(url = %url, search = %filter.search, offset, "Fetching entries page");

        let response = send(self.http, Method::GET, url, self.token.as_deref(), None::<&()>).await?;
        let page: EntriesPage = read_json(response, "entries page").await?;

        debug!(entries = page.len(), total = page.total, "Fetched entries page");
        Ok(page)
    }

    /// Create an entry; the server assigns id and timestamp.
    pub async fn create(&self, input: &EntryInput) -> Result<Entry> {
        let url = endpoint(self.base_url, "/entries")?;
        debug!(url = %url, title = %input.title, "Creating entry");

        let response = send(self.http, Method::POST, url, self.token.as_deref(), Some(input)).await?;
        read_json(response, "created entry").await
    }

    /// Replace the editable fields of entry `id`.
    pub async fn update(&self, id: &EntryId, input: &EntryInput) -> Result<Entry> {
        let url = entry_endpoint(self.base_url, id.as_str())?;
        debug!(url = %url, entry_id = %id, "Updating entry");

        let response = send(self.http, Method::PUT, url, self.token.as_deref(), Some(input)).await?;
        read_json(response, "updated entry").await
    }

    /// Delete entry `id`. A missing entry is an error like any other.
    pub async fn delete(&self, id: &EntryId) -> Result<()> {
        let url = entry_endpoint(self.base_url, id.as_str())?;
        debug!(url = %url, entry_id = %id, "Deleting entry");

        send(self.http, Method::DELETE, url, self.token.as_deref(), None::<&()>).await?;

        debug!(entry_id = %id, "Entry deleted");
        Ok(())
    }

    /// Fetch aggregate counts.
    pub async fn stats(&self) -> Result<Stats> {
        let url = endpoint(self.base_url, "/stats")?;
        debug!(url = %url, "Fetching stats");

        let response = send(self.http, Method::GET, url, self.token.as_deref(), None::<&()>).await?;
        read_json(response, "stats").await
    }

    /// Fetch stats, choosing what a 401 means.
    pub async fn stats_with(&self, on_unauthorized: UnauthorizedBehavior) -> Result<Option<Stats>> {
        match self.stats().await {
            Ok(stats) => Ok(Some(stats)),
            Err(e) if e.is_unauthorized() && on_unauthorized == UnauthorizedBehavior::ReturnNone => {
                debug!("Stats rejected with 401, treating as signed out");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
