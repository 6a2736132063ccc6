//! Marquee command-line client
//!
//! Thin front end over `marquee-client` and `marquee-query`: commands for the
//! account, the catalog list, entry forms and stats, plus an interactive
//! browser with debounced search.

pub mod browse;
pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

use anyhow::Result;
use config::Settings;
use marquee_client::{CatalogClient, FileSessionStore, SessionHolder};
use marquee_query::CatalogQueries;
use std::sync::Arc;

/// Everything a command needs
#[derive(Debug, Clone)]
pub struct App {
    pub settings: Settings,
    pub client: CatalogClient,
    pub queries: CatalogQueries,
}

impl App {
    /// Build the client and query layer from settings, with the session kept
    /// at `settings.session_path`.
    pub fn new(settings: Settings) -> Result<Self> {
        let session = SessionHolder::new(FileSessionStore::new(&settings.session_path));
        Self::with_session(settings, session)
    }

    pub fn with_session(settings: Settings, session: SessionHolder) -> Result<Self> {
        let client = CatalogClient::new(settings.client_config(), session)?;
        let queries = CatalogQueries::new(Arc::new(client.clone()))
            .with_page_size(settings.page_size);

        Ok(Self {
            settings,
            client,
            queries,
        })
    }
}
