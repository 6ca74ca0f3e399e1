//! Integration tests for the storage contract and the provider registry.
//!
//! These go through `Arc<dyn BookStore>` obtained from a registry, the same
//! way the HTTP layer uses a store.

use bookstore_core::{
    register_builtin_providers, registry, Book, BookStore, MemoryBookStore, StoreError,
    StoreRegistry,
};
use futures::future::join_all;
use std::sync::Arc;

/// Create a registry with the built-in providers and return its "mem" store.
fn memory_store() -> Arc<dyn BookStore> {
    let registry = StoreRegistry::new();
    register_builtin_providers(&registry);
    registry.lookup("mem").expect("mem provider registered")
}

fn create_test_book(id: &str) -> Book {
    Book::new(id)
        .with_name(format!("Book {}", id))
        .with_authors(["Author"])
        .with_press("Press")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_distinct_ids_all_succeed() {
    let store = memory_store();
    let count = 200;

    let tasks = (0..count).map(|i| {
        let store = store.clone();
        tokio::spawn(async move { store.create(&create_test_book(&i.to_string())).await })
    });

    for result in join_all(tasks).await {
        result.expect("task panicked").expect("create failed");
    }

    let books = store.get_all().await.unwrap();
    assert_eq!(books.len(), count);
    for i in 0..count {
        let id = i.to_string();
        let book = books.iter().find(|b| b.id == id).expect("book missing");
        assert_eq!(*book, create_test_book(&id));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_on_same_id_have_one_winner() {
    let store = memory_store();
    let contenders = 64;

    let tasks = (0..contenders).map(|i| {
        let store = store.clone();
        tokio::spawn(async move {
            let book = Book::new("contested").with_name(format!("Writer {}", i));
            store.create(&book).await
        })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(*err, StoreError::already_exists("contested"));
    }

    let stored = store.get_all().await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_and_reads_stay_consistent() {
    let store = memory_store();
    store.create(&create_test_book("1")).await.unwrap();

    let writers = (0..50).map(|i| {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .update(&Book::new("1").with_name(format!("Edition {}", i)))
                .await
        })
    });
    let readers = (0..50).map(|_| {
        let store = store.clone();
        tokio::spawn(async move { store.get("1").await })
    });

    for result in join_all(writers).await {
        result.unwrap().unwrap();
    }
    for result in join_all(readers).await {
        let book = result.unwrap().unwrap();
        assert_eq!(book.authors, Some(vec!["Author".to_string()]));
        assert_eq!(book.press, "Press");
    }

    let book = store.get("1").await.unwrap();
    assert!(book.name.starts_with("Edition ") || book.name == "Book 1");
}

#[tokio::test]
async fn test_full_crud_through_trait_object() {
    let store = memory_store();

    store.create(&create_test_book("1")).await.unwrap();
    store.create(&create_test_book("2")).await.unwrap();
    store.create(&create_test_book("3")).await.unwrap();

    let mut ids: Vec<String> = store
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["1", "2", "3"]);

    store
        .update(&Book::new("2").with_press("Another Press"))
        .await
        .unwrap();
    let updated = store.get("2").await.unwrap();
    assert_eq!(updated.press, "Another Press");
    assert_eq!(updated.name, "Book 2");

    store.delete("3").await.unwrap();
    assert!(store.get("3").await.unwrap_err().is_not_found());
    assert_eq!(store.get_all().await.unwrap().len(), 2);
}

#[test]
fn test_concurrent_registration_and_lookup() {
    let registry = Arc::new(StoreRegistry::new());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                let name = format!("provider-{}", i);
                registry.register(name.clone(), Arc::new(MemoryBookStore::new()));
                assert!(registry.lookup(&name).is_ok());
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("registration thread panicked");
    }

    assert_eq!(registry.names().len(), 16);
}

#[test]
fn test_process_wide_registry() {
    let name = "store-tests-global-mem";
    let err = registry::lookup(name).err().expect("not registered yet");
    assert!(matches!(err, StoreError::UnknownProvider { .. }));

    let instance: Arc<dyn BookStore> = Arc::new(MemoryBookStore::new());
    registry::register(name, instance.clone());

    let found = registry::lookup(name).unwrap();
    assert!(Arc::ptr_eq(&found, &instance));
}
