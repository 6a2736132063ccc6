//! Mutations and their effect on cached queries.

mod common;

use common::{settle, valid_form, Call, FakeCatalog};
use marquee_core::{EntryFilter, EntryForm, EntryId, EntryType};
use marquee_query::{CatalogQueries, ListController, QueryError, QueryStatus};
use std::sync::Arc;
use std::time::Duration;

fn queries(api: &Arc<FakeCatalog>) -> CatalogQueries {
    CatalogQueries::new(Arc::clone(api) as Arc<dyn marquee_client::CatalogApi>)
}

/// Mount the list and the stats and wait for both to load.
async fn mounted(
    queries: &CatalogQueries,
) -> (
    ListController,
    tokio::sync::watch::Receiver<marquee_query::QuerySnapshot<marquee_core::Stats>>,
) {
    let mut list = ListController::new(queries.clone(), EntryFilter::default());
    settle(&mut list).await;

    let mut stats = queries.watch_stats();
    stats
        .wait_for(|s| s.status == QueryStatus::Success)
        .await
        .unwrap();
    (list, stats)
}

#[tokio::test]
async fn test_create_refetches_entries_and_stats() {
    let api = FakeCatalog::with_entries(3);
    let queries = queries(&api);
    let (mut list, mut stats) = mounted(&queries).await;

    let entry = queries
        .create_entry(&valid_form("Breaking Bad"))
        .await
        .unwrap();
    assert_eq!(entry.entry_type, EntryType::Series);

    let refreshed = tokio::time::timeout(
        Duration::from_secs(5),
        stats.wait_for(|s| s.data.as_ref().map(|d| d.total) == Some(4) && !s.is_fetching),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();
    assert_eq!(refreshed.data.unwrap().tv_shows, 1);

    tokio::time::timeout(Duration::from_secs(5), async {
        while list.entries().count() != 4 {
            assert!(list.changed().await);
        }
    })
    .await
    .unwrap();
    assert!(list.entries().any(|e| e.title == "Breaking Bad"));

    assert_eq!(api.count(&Call::Stats), 2);
    assert_eq!(
        api.list_calls(),
        vec![(String::new(), 0), (String::new(), 0)]
    );
}

#[tokio::test]
async fn test_failed_mutation_leaves_caches_untouched() {
    let api = FakeCatalog::with_entries(3);
    let queries = queries(&api);
    let (list, _stats) = mounted(&queries).await;

    api.fail_mutations(500, "Database unavailable");
    let err = queries
        .create_entry(&valid_form("Breaking Bad"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Database unavailable");

    let entries = queries.entries_snapshot(&EntryFilter::default()).unwrap();
    assert!(!entries.is_stale);
    assert!(entries.fetching.is_none());
    assert!(!queries.stats_snapshot().unwrap().is_stale);

    assert_eq!(api.count(&Call::Stats), 1);
    assert_eq!(api.list_calls().len(), 1);
    assert_eq!(list.entries().count(), 3);
}

#[tokio::test]
async fn test_short_title_never_reaches_network() {
    let api = FakeCatalog::new();
    let queries = queries(&api);

    let form = EntryForm {
        title: "A".to_string(),
        ..valid_form("unused")
    };
    let err = queries.create_entry(&form).await.unwrap_err();

    match &err {
        QueryError::Validation(errors) => assert_eq!(
            errors.message_for("title"),
            Some("Title must be at least 2 characters.")
        ),
        other => panic!("Expected validation error, got {:?}", other),
    }
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_update_never_reaches_network() {
    let api = FakeCatalog::with_entries(1);
    let queries = queries(&api);

    let form = EntryForm {
        budget: "lots".to_string(),
        ..valid_form("Breaking Bad")
    };
    let err = queries
        .update_entry(&EntryId::new("1"), &form)
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::Validation(_)));
    assert_eq!(err.to_string(), "Budget must be a number.");
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_update_refetches_list() {
    let api = FakeCatalog::with_entries(2);
    let queries = queries(&api);
    let (mut list, _stats) = mounted(&queries).await;

    let first = list.entries().next().unwrap().clone();
    let mut form = EntryForm::from_entry(&first);
    form.title = "Renamed".to_string();
    queries.update_entry(&first.id, &form).await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        while list.entries().next().map(|e| e.title.as_str()) != Some("Renamed") {
            assert!(list.changed().await);
        }
    })
    .await
    .unwrap();
    assert_eq!(api.count(&Call::Update(first.id.to_string())), 1);
}

#[tokio::test]
async fn test_delete_missing_entry_surfaces_server_text() {
    let api = FakeCatalog::with_entries(3);
    let queries = queries(&api);
    let (list, _stats) = mounted(&queries).await;

    let err = queries
        .delete_entry(&EntryId::new("404"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Entry not found");
    assert_eq!(err.client_error().and_then(|e| e.status()), Some(404));

    assert_eq!(list.entries().count(), 3);
    assert!(!queries
        .entries_snapshot(&EntryFilter::default())
        .unwrap()
        .is_stale);
    assert_eq!(api.list_calls().len(), 1);
}

#[tokio::test]
async fn test_delete_refetches_stats() {
    let api = FakeCatalog::with_entries(3);
    let queries = queries(&api);
    let (_list, mut stats) = mounted(&queries).await;

    queries.delete_entry(&EntryId::new("2")).await.unwrap();

    tokio::time::timeout(
        Duration::from_secs(5),
        stats.wait_for(|s| s.data.as_ref().map(|d| d.total) == Some(2)),
    )
    .await
    .unwrap()
    .unwrap();
}

#[tokio::test]
async fn test_unmounted_stats_refetch_on_next_read() {
    let api = FakeCatalog::with_entries(3);
    let queries = queries(&api);

    assert_eq!(queries.stats().await.unwrap().total, 3);
    queries.create_entry(&valid_form("Breaking Bad")).await.unwrap();

    // Nobody is watching, so nothing was fetched yet
    assert_eq!(api.count(&Call::Stats), 1);
    assert!(queries.stats_snapshot().unwrap().is_stale);

    assert_eq!(queries.stats().await.unwrap().total, 4);
    assert_eq!(api.count(&Call::Stats), 2);
}
