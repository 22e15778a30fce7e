use std::collections::HashSet;
use std::time::Duration;

use stubby_shortener::{Allocation, MappingStore, Shortener, StoreError, StoreSettings};
use stubby_storage::MySqlBackend;
use stubby_test_infra::mysql::MySqlServer;

struct Fixture {
    _mysql: MySqlServer,
    backend: MySqlBackend,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::start().await.expect("start mysql");
        let url = mysql.database_url().await.expect("mysql url");
        let backend = connect_with_retry(&url).await;
        backend.ensure_schema().await.expect("create schema");

        Self {
            _mysql: mysql,
            backend,
        }
    }

    fn settings(allocation: Allocation) -> StoreSettings {
        StoreSettings::builder()
            .allocation(allocation)
            .operation_timeout(Some(Duration::from_secs(30)))
            .build()
    }
}

async fn connect_with_retry(url: &str) -> MySqlBackend {
    let mut last_error = None;

    for _ in 0..20 {
        match MySqlBackend::connect(url).await {
            Ok(backend) => return backend,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect mysql: {last_error:?}");
}

async fn round_trip(allocation: Allocation) {
    let fixture = Fixture::start().await;
    let store = MappingStore::initialize(fixture.backend.clone(), Fixture::settings(allocation))
        .await
        .unwrap();

    let a = store.create("example.com/a").await.unwrap();
    let b = store.create("example.com/b").await.unwrap();

    assert_eq!(a.as_str(), "b");
    assert_eq!(b.as_str(), "c");
    assert_eq!(store.resolve("b").await.unwrap(), "example.com/a");
    assert_eq!(store.resolve("c").await.unwrap(), "example.com/b");

    // "B" differs from "b" only in case and must stay a miss.
    assert!(matches!(
        store.resolve("B").await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.resolve("has space").await,
        Err(StoreError::InvalidCode(_))
    ));
}

#[tokio::test]
async fn create_then_resolve_with_in_process_allocation() {
    round_trip(Allocation::InProcess).await;
}

#[tokio::test]
async fn create_then_resolve_with_backend_allocation() {
    round_trip(Allocation::Backend).await;
}

#[tokio::test]
async fn stores_sharing_one_database_never_collide() {
    let fixture = Fixture::start().await;
    let settings = Fixture::settings(Allocation::Backend);

    let first = MappingStore::initialize(fixture.backend.clone(), settings.clone())
        .await
        .unwrap();
    let second = MappingStore::initialize(fixture.backend.clone(), settings)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..40 {
        let store = if i % 2 == 0 { first.clone() } else { second.clone() };
        handles.push(tokio::spawn(async move {
            let url = format!("https://example.com/{i}");
            (store.create(&url).await.unwrap(), url)
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let (code, url) = handle.await.unwrap();
        assert!(ids.insert(code.id().unwrap()));
        assert_eq!(first.resolve(code.as_str()).await.unwrap(), url);
    }

    assert_eq!(ids.len(), 40);
}

#[tokio::test]
async fn restart_recovers_the_allocator_from_mysql() {
    let fixture = Fixture::start().await;
    let settings = Fixture::settings(Allocation::InProcess);

    let store = MappingStore::initialize(fixture.backend.clone(), settings.clone())
        .await
        .unwrap();
    for i in 1..=3 {
        store.create(&format!("https://example.com/{i}")).await.unwrap();
    }
    drop(store);

    let reopened = MappingStore::initialize(fixture.backend.clone(), settings)
        .await
        .unwrap();
    assert_eq!(reopened.next_id(), Some(4));
    assert_eq!(reopened.resolve("d").await.unwrap(), "https://example.com/3");
}
