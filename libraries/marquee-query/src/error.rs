//! Error types for the query layer.

use marquee_client::ClientError;
use marquee_core::ValidationErrors;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by queries and mutations.
///
/// Cloneable so one failed fetch can be handed to every subscriber that was
/// waiting on it.
#[derive(Error, Debug, Clone)]
pub enum QueryError {
    /// Form rejected before submission; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Request failed or the server answered non-2xx
    #[error(transparent)]
    Client(Arc<ClientError>),
}

impl QueryError {
    /// The underlying client error, if the failure came from the network
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            QueryError::Client(e) => Some(e),
            QueryError::Validation(_) => None,
        }
    }
}

impl From<ClientError> for QueryError {
    fn from(e: ClientError) -> Self {
        QueryError::Client(Arc::new(e))
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
