//! Seeding and paging against a live PostgreSQL.
//!
//! Run with `cargo test -p libris-db -- --ignored` once DATABASE_URL (or the
//! default test URL) points at a reachable database.

use serde_json::json;
use uuid::Uuid;

use libris_db::test_fixtures::{SeedFile, TestDatabase};
use libris_db::{
    ingest, reseed, seed_if_empty, CatalogStore, Error, ItemType, SeedOutcome, ValidationMode,
};

fn load_env() {
    dotenvy::dotenv().ok();
}

fn sample_seed() -> SeedFile {
    SeedFile::new(&[
        json!({"title": "Zebra", "file_name": "zebra.pdf", "topics": ["animals"]}),
        json!({"title": "apple", "file_name": "apple.pdf", "topics": ["fruit", "food"]}),
        json!({"title": "Mango", "file_name": "mango.pdf", "topics": ["fruit"]}),
    ])
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_seed_if_empty_then_skips() {
    load_env();
    let test_db = TestDatabase::new().await;
    let seed = sample_seed();

    let first = seed_if_empty(&test_db.db, seed.path()).await.unwrap();
    let second = seed_if_empty(&test_db.db, seed.path()).await.unwrap();

    assert_eq!(first, SeedOutcome::Seeded { inserted: 3 });
    assert_eq!(second, SeedOutcome::Skipped { existing: 3 });
    assert_eq!(test_db.db.items.count().await.unwrap(), 3);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_list_page_orders_by_title() {
    load_env();
    let test_db = TestDatabase::new().await;
    let seed = sample_seed();
    seed_if_empty(&test_db.db, seed.path()).await.unwrap();

    let page = test_db.db.items.list_page(1, 1).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "Mango");
    assert_eq!(page[0].sequence_number, Some(2));
    assert_eq!(page[0].source.as_deref(), Some("mango.pdf"));
    assert_eq!(page[0].item_type, ItemType::Book);
    assert_eq!(page[0].attributes, Some(json!({"format": "pdf"})));
    assert!(page[0].created_at.is_some());

    let all = test_db.db.items.list_page(0, 100).await.unwrap();
    let titles: Vec<_> = all.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["apple", "Mango", "Zebra"]);

    assert!(test_db.db.items.list_page(3, 20).await.unwrap().is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_get_by_identity() {
    load_env();
    let test_db = TestDatabase::new().await;
    let seed = sample_seed();
    seed_if_empty(&test_db.db, seed.path()).await.unwrap();

    let listed = test_db.db.items.list_page(0, 20).await.unwrap();
    let zebra = listed.iter().find(|i| i.title == "Zebra").unwrap();

    let found = test_db
        .db
        .items
        .get_by_identity(zebra.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(&found, zebra);
    assert_eq!(found.sequence_number, Some(3));
    assert_eq!(found.topics, vec!["animals".to_string()]);

    let missing = test_db
        .db
        .items
        .get_by_identity(Uuid::new_v4())
        .await
        .unwrap();
    assert!(missing.is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_reseed_replaces_catalog_and_restarts_identity() {
    load_env();
    let test_db = TestDatabase::new().await;
    let seed = sample_seed();
    seed_if_empty(&test_db.db, seed.path()).await.unwrap();
    let before = test_db.db.items.list_page(0, 20).await.unwrap();

    let replacement = SeedFile::new(&[
        json!({"title": "beta", "file_name": "b.pdf"}),
        json!({"title": "Alpha", "file_name": "a.pdf", "topics": ["greek"]}),
    ]);
    let inserted = reseed(&test_db.db, replacement.path()).await.unwrap();

    assert_eq!(inserted, 2);
    assert_eq!(test_db.db.items.count().await.unwrap(), 2);
    assert_eq!(test_db.db.items.row_ids().await.unwrap(), vec![1, 2]);
    for old in &before {
        assert!(test_db
            .db
            .items
            .get_by_identity(old.id)
            .await
            .unwrap()
            .is_none());
    }

    let topics = test_db.db.topics.list().await.unwrap();
    let names: Vec<_> = topics.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["greek"]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_reseed_missing_file_leaves_catalog_untouched() {
    load_env();
    let test_db = TestDatabase::new().await;
    let seed = sample_seed();
    seed_if_empty(&test_db.db, seed.path()).await.unwrap();

    let missing = seed.path().with_file_name("absent.json");
    let result = reseed(&test_db.db, &missing).await;

    assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    assert_eq!(test_db.db.items.count().await.unwrap(), 3);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_reseed_invalid_record_leaves_catalog_untouched() {
    load_env();
    let test_db = TestDatabase::new().await;
    let seed = sample_seed();
    seed_if_empty(&test_db.db, seed.path()).await.unwrap();

    let invalid = SeedFile::new(&[
        json!({"title": "fine"}),
        json!({"title": "odd", "item_type": "pamphlet"}),
    ]);
    let result = reseed(&test_db.db, invalid.path()).await;

    assert!(matches!(result, Err(Error::Validation { index: 1, .. })));
    assert_eq!(test_db.db.items.count().await.unwrap(), 3);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_topic_counts_and_item_topics() {
    load_env();
    let test_db = TestDatabase::new().await;
    let seed = sample_seed();
    seed_if_empty(&test_db.db, seed.path()).await.unwrap();

    let topics = test_db.db.items.list_topics().await.unwrap();
    let counts: Vec<_> = topics
        .iter()
        .map(|t| (t.name.as_str(), t.item_count))
        .collect();
    assert_eq!(counts, vec![("animals", 1), ("food", 1), ("fruit", 2)]);

    let apple = &test_db.db.items.list_page(0, 1).await.unwrap()[0];
    let names = test_db.db.topics.get_for_item(apple.id).await.unwrap();
    assert_eq!(names, vec!["food".to_string(), "fruit".to_string()]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_durable_order_matches_ingestion_for_non_ascii_titles() {
    load_env();
    let test_db = TestDatabase::new().await;
    let records = vec![
        json!({"title": "fable"}),
        json!({"title": "école"}),
        json!({"title": "Zebra"}),
    ];
    let seed = SeedFile::new(&records);
    seed_if_empty(&test_db.db, seed.path()).await.unwrap();

    let batch: Vec<_> = ingest(&records, ValidationMode::Strict)
        .unwrap()
        .into_iter()
        .map(|i| (i.title, i.sequence_number))
        .collect();
    let listed = test_db.db.items.list_page(0, 100).await.unwrap();
    let durable: Vec<_> = listed
        .iter()
        .map(|i| (i.title.clone(), i.sequence_number))
        .collect();

    assert_eq!(
        batch,
        vec![
            ("fable".to_string(), Some(1)),
            ("Zebra".to_string(), Some(2)),
            ("école".to_string(), Some(3)),
        ]
    );
    assert_eq!(durable, batch);
    assert_eq!(test_db.db.items.row_ids().await.unwrap(), vec![1, 2, 3]);

    // Paged and single-item numbering agree with the full listing.
    let second = test_db.db.items.list_page(1, 1).await.unwrap();
    assert_eq!(second[0].title, "Zebra");
    assert_eq!(second[0].sequence_number, Some(2));
    for item in &listed {
        let found = test_db
            .db
            .items
            .get_by_identity(item.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.sequence_number, item.sequence_number);
    }

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_equal_titles_keep_input_order() {
    load_env();
    let test_db = TestDatabase::new().await;
    let seed = SeedFile::new(&[
        json!({"title": "Dune", "file_name": "first.pdf"}),
        json!({"title": "DUNE", "file_name": "second.pdf"}),
        json!({"title": "dune", "file_name": "third.pdf"}),
    ]);
    seed_if_empty(&test_db.db, seed.path()).await.unwrap();

    let listed = test_db.db.items.list_page(0, 20).await.unwrap();
    let sources: Vec<_> = listed.iter().map(|i| i.source.as_deref()).collect();

    assert_eq!(
        sources,
        vec![Some("first.pdf"), Some("second.pdf"), Some("third.pdf")]
    );
    assert_eq!(test_db.db.items.row_ids().await.unwrap(), vec![1, 2, 3]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_seed_if_empty_missing_file_fails_without_rows() {
    load_env();
    let test_db = TestDatabase::new().await;
    let dir = tempfile::tempdir().unwrap();

    let result = seed_if_empty(&test_db.db, &dir.path().join("data.json")).await;

    assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    assert_eq!(test_db.db.items.count().await.unwrap(), 0);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL pointing at a test database
async fn test_seed_if_empty_invalid_record_commits_nothing() {
    load_env();
    let test_db = TestDatabase::new().await;
    let seed = SeedFile::new(&[
        json!({"title": "Valid", "topics": ["kept"]}),
        json!({"title": "Odd", "item_type": "pamphlet"}),
    ]);

    let result = seed_if_empty(&test_db.db, seed.path()).await;

    assert!(matches!(result, Err(Error::Validation { index: 1, .. })));
    assert_eq!(test_db.db.items.count().await.unwrap(), 0);
    assert!(test_db.db.topics.list().await.unwrap().is_empty());

    test_db.cleanup().await;
}
