//! Storage layer tests against a temporary SQLite database

use std::sync::Arc;

use tempfile::TempDir;

use geotracker::errors::GeoTrackerError;
use geotracker::services::register_user;
use geotracker::storage::{NewHistoryEntry, SeaOrmStorage};
use geotracker::utils::password::verify_password;

async fn open_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("storage_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = SeaOrmStorage::new(&db_url, "sqlite", 5)
        .await
        .expect("Failed to create storage");
    (Arc::new(storage), dir)
}

fn entry(user_id: i64, ip: &str) -> NewHistoryEntry {
    NewHistoryEntry {
        user_id,
        ip_address: ip.to_string(),
        country: Some("Australia".to_string()),
        city: None,
        isp: Some("Cloudflare".to_string()),
    }
}

#[tokio::test]
async fn test_bare_path_gets_sqlite_prefix() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("bare.db");
    let storage = SeaOrmStorage::new(&db_path.display().to_string(), "sqlite", 1)
        .await
        .expect("bare path should open");
    storage.ping().await.expect("ping");
    assert!(db_path.exists());
    assert_eq!(storage.backend_name(), "sqlite");
}

#[tokio::test]
async fn test_users_are_unique_by_email() {
    let (storage, _dir) = open_storage().await;

    let created = register_user(&storage, "test@example.com", "password123")
        .await
        .expect("create");
    assert!(created.id > 0);
    assert!(verify_password("password123", &created.password_hash).expect("verify"));

    let found = storage
        .find_user_by_email("test@example.com")
        .await
        .expect("query")
        .expect("user exists");
    assert_eq!(found, created);

    let dup = register_user(&storage, "test@example.com", "another").await;
    assert!(matches!(dup, Err(GeoTrackerError::AlreadyExists(_))));

    assert!(
        storage
            .find_user_by_email("missing@example.com")
            .await
            .expect("query")
            .is_none()
    );
}

#[tokio::test]
async fn test_register_rejects_blank_input() {
    let (storage, _dir) = open_storage().await;

    for (email, password) in [("", "pw"), ("not-an-email", "pw"), ("a@b.c", "")] {
        let result = register_user(&storage, email, password).await;
        assert!(matches!(result, Err(GeoTrackerError::InvalidRequest(_))));
    }
}

#[tokio::test]
async fn test_history_insert_list_delete() {
    let (storage, _dir) = open_storage().await;
    let alice = register_user(&storage, "alice@example.com", "pw")
        .await
        .expect("create");
    let bob = register_user(&storage, "bob@example.com", "pw")
        .await
        .expect("create");

    let first = storage.insert_history(entry(alice.id, "1.1.1.1")).await.expect("insert");
    let second = storage.insert_history(entry(alice.id, "8.8.8.8")).await.expect("insert");
    let foreign = storage.insert_history(entry(bob.id, "9.9.9.9")).await.expect("insert");

    assert_eq!(first.user_id, alice.id);
    assert_eq!(first.country.as_deref(), Some("Australia"));
    assert_eq!(first.city, None);

    let listed = storage.list_history(alice.id).await.expect("list");
    assert_eq!(listed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![second.id, first.id]);

    // 不属于该用户的 id 被忽略
    let removed = storage
        .delete_history(alice.id, &[first.id, foreign.id])
        .await
        .expect("delete");
    assert_eq!(removed, 1);

    let listed = storage.list_history(alice.id).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[0].ip_address, "8.8.8.8");

    let bob_entries = storage.list_history(bob.id).await.expect("list");
    assert_eq!(bob_entries.len(), 1);
    assert_eq!(bob_entries[0].id, foreign.id);
}
