//! Shared fixtures: an in-memory catalog standing in for the REST API.
#![allow(dead_code)]

use async_trait::async_trait;
use marquee_client::{CatalogApi, ClientError, Result};
use marquee_core::{EntriesPage, Entry, EntryForm, EntryId, EntryInput, EntryType, Stats};
use marquee_query::{ListController, ListState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::sync::Semaphore;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// One call received by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List {
        search: String,
        limit: u32,
        offset: u64,
    },
    Create,
    Update(String),
    Delete(String),
    Stats,
}

#[derive(Default)]
pub struct FakeCatalog {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
    calls: Mutex<Vec<Call>>,
    list_gate: Mutex<Option<Arc<Semaphore>>>,
    list_failure: Mutex<Option<(u16, String)>>,
    mutation_failure: Mutex<Option<(u16, String)>>,
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        init_logging();
        Arc::new(Self::default())
    }

    /// Catalog holding `count` movies titled "Entry 1", "Entry 2", ...
    pub fn with_entries(count: usize) -> Arc<Self> {
        let catalog = Self::new();
        for i in 1..=count {
            catalog.insert(&format!("Entry {}", i), EntryType::Film);
        }
        catalog
    }

    pub fn insert(&self, title: &str, entry_type: EntryType) -> Entry {
        let input = EntryInput {
            title: title.to_string(),
            entry_type,
            director: "Someone".to_string(),
            budget: "1000000".to_string(),
            location: "LA".to_string(),
            duration: "120 min".to_string(),
            year: "2010".to_string(),
        };
        let entry = self.build(&input);
        self.entries.lock().unwrap().push(entry.clone());
        entry
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<(String, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::List { search, offset, .. } => Some((search, offset)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls().iter().filter(|call| *call == wanted).count()
    }

    /// Hold every list request until a permit is added to the returned gate.
    pub fn gate_lists(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.list_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fail_lists(&self, status: u16, message: &str) {
        *self.list_failure.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn heal_lists(&self) {
        *self.list_failure.lock().unwrap() = None;
    }

    pub fn fail_mutations(&self, status: u16, message: &str) {
        *self.mutation_failure.lock().unwrap() = Some((status, message.to_string()));
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn build(&self, input: &EntryInput) -> Entry {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Entry {
            id: EntryId::new(id.to_string()),
            title: input.title.clone(),
            entry_type: input.entry_type,
            director: input.director.clone(),
            budget: input.budget.clone(),
            location: input.location.clone(),
            duration: input.duration.clone(),
            year: input.year.clone(),
            created_at: "2024-01-15T10:00:00Z".to_string(),
        }
    }

    fn mutation_error(&self) -> Option<ClientError> {
        self.mutation_failure
            .lock()
            .unwrap()
            .clone()
            .map(|(status, message)| ClientError::Api { status, message })
    }

    fn not_found() -> ClientError {
        ClientError::Api {
            status: 404,
            message: "Entry not found".to_string(),
        }
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_entries(
        &self,
        filter: &marquee_core::EntryFilter,
        limit: u32,
        offset: u64,
    ) -> Result<EntriesPage> {
        self.record(Call::List {
            search: filter.search.clone(),
            limit,
            offset,
        });

        let gate = self.list_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate open").forget();
        }

        if let Some((status, message)) = self.list_failure.lock().unwrap().clone() {
            return Err(ClientError::Api { status, message });
        }

        let needle = filter.search.to_lowercase();
        let matching: Vec<Entry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        Ok(EntriesPage {
            total: matching.len() as u64,
            entries: matching
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect(),
        })
    }

    async fn create_entry(&self, input: &EntryInput) -> Result<Entry> {
        self.record(Call::Create);
        if let Some(e) = self.mutation_error() {
            return Err(e);
        }

        let entry = self.build(input);
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(&self, id: &EntryId, input: &EntryInput) -> Result<Entry> {
        self.record(Call::Update(id.to_string()));
        if let Some(e) = self.mutation_error() {
            return Err(e);
        }

        let mut entries = self.entries.lock().unwrap();
        let existing = entries
            .iter_mut()
            .find(|e| e.id == *id)
            .ok_or_else(Self::not_found)?;
        existing.title = input.title.clone();
        existing.entry_type = input.entry_type;
        existing.director = input.director.clone();
        existing.budget = input.budget.clone();
        existing.location = input.location.clone();
        existing.duration = input.duration.clone();
        existing.year = input.year.clone();
        Ok(existing.clone())
    }

    async fn delete_entry(&self, id: &EntryId) -> Result<()> {
        self.record(Call::Delete(id.to_string()));
        if let Some(e) = self.mutation_error() {
            return Err(e);
        }

        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id != *id);
        if entries.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn stats(&self) -> Result<Stats> {
        self.record(Call::Stats);
        let entries = self.entries.lock().unwrap();
        let movies = entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Film)
            .count() as u64;
        Ok(Stats {
            total: entries.len() as u64,
            movies,
            tv_shows: entries.len() as u64 - movies,
        })
    }
}

/// A form that passes validation
pub fn valid_form(title: &str) -> EntryForm {
    EntryForm {
        title: title.to_string(),
        entry_type: "tv-show".to_string(),
        director: "Vince Gilligan".to_string(),
        budget: "3000000".to_string(),
        location: "Albuquerque".to_string(),
        duration: "49 min/episode".to_string(),
        year: "2008-2013".to_string(),
    }
}

/// Wait until the list has no fetch in flight.
pub async fn settle(list: &mut ListController) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while matches!(list.state(), ListState::Loading | ListState::LoadingMore) {
            assert!(list.changed().await, "list query vanished");
        }
    })
    .await
    .expect("list settled");
}
