mod common;

use anyhow::Result;
use common::*;
use rust_decimal::Decimal;
use serde_json::json;

use estate_store::filter::{FilterOptions, SortDirection};
use estate_store::models::{Payment, Reservation};
use estate_store::store::{storage_key, FileStorage, MemoryStorage, Storage, Store};
use estate_store::StoreError;

fn persisted(version: u32) -> Store<Reservation> {
    Store::new(options().persist(true).version(version))
}

fn booking(id: &str) -> Reservation {
    let mut r = reservation(id, "user-1", ts("2024-07-01T15:00:00Z"), 3, 450);
    r.payments.push(Payment {
        id: format!("{}-p1", id),
        amount: Decimal::new(15075, 2),
        method: Some("card".to_string()),
        paid_at: ts("2024-06-01T10:30:00Z"),
    });
    r
}

#[tokio::test]
async fn test_round_trip_through_file_storage() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path());

    let mut store = persisted(1);
    store.set_items(vec![booking("r1"), booking("r2")]);
    store.set_filters(FilterOptions::new().sorted_by("check_in_date", SortDirection::Desc));
    store.save(&storage).await?;
    assert!(!store.is_dirty());
    assert!(dir.path().join("reservation-store-storage.json").exists());

    let mut restored = persisted(1);
    assert!(restored.load(&storage).await?, "snapshot should hydrate");
    assert_eq!(restored.items(), store.items(), "dates and decimals survive the round trip");
    assert_eq!(restored.filters().sort_by.as_deref(), Some("check_in_date"));
    assert_eq!(
        restored.get_by_id("r1").map(|r| r.amount_paid()),
        Some(Decimal::new(15075, 2))
    );
    Ok(())
}

#[tokio::test]
async fn test_version_mismatch_discards_snapshot() -> Result<()> {
    let storage = MemoryStorage::new();
    let mut v1 = persisted(1);
    v1.set_items(vec![booking("r1")]);
    v1.save(&storage).await?;

    let mut v2 = persisted(2);
    assert!(!v2.load(&storage).await?);
    assert!(v2.is_empty(), "a stale snapshot must not hydrate");
    Ok(())
}

#[tokio::test]
async fn test_persistence_off_touches_nothing() -> Result<()> {
    let storage = MemoryStorage::new();
    let mut store: Store<Reservation> = Store::new(options());
    store.set_items(vec![booking("r1")]);

    store.save(&storage).await?;
    assert!(storage.is_empty().await);
    assert!(!store.save_if_dirty(&storage).await?);
    assert!(!store.load(&storage).await?);
    Ok(())
}

#[tokio::test]
async fn test_save_if_dirty_writes_once() -> Result<()> {
    let storage = MemoryStorage::new();
    let mut store = persisted(1);
    store.add_item(booking("r1"));

    assert!(store.save_if_dirty(&storage).await?);
    assert!(!store.save_if_dirty(&storage).await?, "nothing changed since the last save");

    store.remove_item("r1");
    assert!(store.save_if_dirty(&storage).await?);
    Ok(())
}

#[tokio::test]
async fn test_purge_removes_snapshot() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path());
    let mut store = persisted(1);
    store.set_items(vec![booking("r1")]);
    store.save(&storage).await?;

    store.purge(&storage).await?;
    assert!(storage.get_item(&storage_key(store.name())).await?.is_none());
    store.purge(&storage).await?;
    Ok(())
}

#[tokio::test]
async fn test_corrupt_item_names_its_index() -> Result<()> {
    let storage = MemoryStorage::new();
    storage
        .set_item(
            "reservation-store-storage",
            &json!({"version": 1, "state": {"items": [
                serde_json::to_value(booking("r1"))?,
                {"id": "r2"}
            ]}}),
        )
        .await?;

    let mut store = persisted(1);
    let err = store.load(&storage).await.err();
    match err {
        Some(StoreError::Serialization { message, .. }) => assert!(message.contains("item 1"), "{}", message),
        other => panic!("expected serialization error, got {:?}", other),
    }
    assert!(store.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_file_storage_rejects_path_keys() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path());
    let result = storage.set_item("../escape", &json!({})).await;
    assert!(matches!(result, Err(StoreError::Storage(_))));
    Ok(())
}
