//! Catalog entry domain types
use super::ids::EntryId;
use super::wire::string_or_number;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a catalog entry
///
/// The API tags these as `"movie"` and `"tv-show"`; `"film"` and `"series"`
/// are accepted on read as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    #[serde(rename = "movie", alias = "film")]
    Film,
    #[serde(rename = "tv-show", alias = "series")]
    Series,
}

impl EntryType {
    /// Wire tag sent to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Film => "movie",
            EntryType::Series => "tv-show",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            EntryType::Film => "Movie",
            EntryType::Series => "TV Show",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "film" => Ok(EntryType::Film),
            "tv-show" | "series" => Ok(EntryType::Series),
            other => Err(format!("Unknown entry type: {}", other)),
        }
    }
}

/// A catalog record as stored by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Server-assigned, never reused
    pub id: EntryId,

    pub title: String,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    pub director: String,

    /// Decimal amount kept as text to avoid precision loss
    #[serde(default, deserialize_with = "string_or_number")]
    pub budget: String,

    #[serde(default)]
    pub location: String,

    /// Free text, e.g. "148 min" or "49 min/episode"
    #[serde(default)]
    pub duration: String,

    /// Year or era, e.g. "2010" or "2008-2013"
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,

    /// Server-assigned creation timestamp (ISO string)
    #[serde(default)]
    pub created_at: String,
}

/// Validated body for create and update requests
///
/// Produced by [`crate::EntryForm::validate`]; the identifier and creation
/// timestamp are never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInput {
    pub title: String,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    pub year: String,
}

/// Filter identifying one logical paginated list
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryFilter {
    pub search: String,
}

impl EntryFilter {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
        }
    }

    /// Whether the `search` parameter should be sent at all
    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }
}

/// One fetched batch of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntriesPage {
    pub entries: Vec<Entry>,

    /// Number of entries matching the filter across all pages
    pub total: u64,
}

impl EntriesPage {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
