//! Marquee API Client
//!
//! HTTP client library for the catalog REST API.
//!
//! # Features
//!
//! - **Authentication**: Signup, login, logout
//! - **Catalog**: Paged entry listing with search, create, update, delete, stats
//! - **Session**: Token and profile persistence behind a `SessionStore`, plus a route guard
//!
//! # Example
//!
//! ```ignore
//! use marquee_client::{CatalogClient, ClientConfig, FileSessionStore, SessionHolder};
//! use marquee_core::Credentials;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionHolder::new(FileSessionStore::new("session.json"));
//!     let client = CatalogClient::new(ClientConfig::new("http://localhost:3000"), session)?;
//!
//!     let session = client.login(&Credentials::new("ana@example.com", "secret1")).await?;
//!     println!("Logged in as {}", session.user.name);
//!
//!     let stats = client.entries().stats().await?;
//!     println!("{} entries", stats.total);
//!
//!     Ok(())
//! }
//! ```

mod api;
mod auth;
mod client;
mod entries;
mod error;
mod request;
mod session;
mod types;

// Re-export main types
pub use api::CatalogApi;
pub use client::CatalogClient;
pub use error::{ClientError, Result};
pub use session::{
    FileSessionStore, MemorySessionStore, Route, RouteDecision, Session, SessionHolder,
    SessionStore,
};
pub use types::{ClientConfig, UnauthorizedBehavior};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use entries::EntriesClient;
