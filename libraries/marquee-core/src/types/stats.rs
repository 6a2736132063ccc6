//! Aggregate catalog statistics
use serde::{Deserialize, Serialize};

/// Server-computed catalog counts
///
/// Missing counts decode as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub movies: u64,

    #[serde(default)]
    pub tv_shows: u64,
}
