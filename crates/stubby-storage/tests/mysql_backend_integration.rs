use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;
use stubby_core::{Mapping, ShortCode};
use stubby_storage::{Backend, MySqlBackend, ReadBackend, StorageError};
use stubby_test_infra::mysql::MySqlServer;

struct Fixture {
    _mysql: MySqlServer,
    backend: MySqlBackend,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::start().await.expect("start mysql");
        let url = mysql.database_url().await.expect("mysql url");
        let pool = connect_with_retry(&url).await;

        let backend = MySqlBackend::new(pool);
        backend.ensure_schema().await.expect("create schema");

        Self {
            _mysql: mysql,
            backend,
        }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::MySqlPool {
    let mut last_error = None;

    for _ in 0..20 {
        match MySqlPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
        {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect mysql: {last_error:?}");
}

fn code(value: &str) -> ShortCode {
    ShortCode::parse(value).unwrap()
}

#[tokio::test]
async fn insert_and_find_by_code() {
    let fixture = Fixture::start().await;

    fixture
        .backend
        .insert(&Mapping::new(1, "example.com/a"))
        .await
        .unwrap();

    let found = fixture.backend.find_by_code(&code("b")).await.unwrap().unwrap();
    assert_eq!(found, Mapping::new(1, "example.com/a"));
    assert!(fixture.backend.find_by_code(&code("B")).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_identifier_conflicts() {
    let fixture = Fixture::start().await;

    fixture
        .backend
        .insert(&Mapping::new(5, "https://one.example"))
        .await
        .unwrap();

    let err = fixture
        .backend
        .insert(&Mapping::new(5, "https://two.example"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
async fn max_id_and_generated_identifiers() {
    let fixture = Fixture::start().await;
    assert_eq!(fixture.backend.max_id().await.unwrap(), None);

    let first = fixture
        .backend
        .insert_generated("https://a.example")
        .await
        .unwrap();
    assert_eq!(first.id, 1);

    fixture
        .backend
        .insert(&Mapping::new(40, "https://forty.example"))
        .await
        .unwrap();
    assert_eq!(fixture.backend.max_id().await.unwrap(), Some(40));

    let next = fixture
        .backend
        .insert_generated("https://b.example")
        .await
        .unwrap();
    assert_eq!(next.id, 41);

    let found = fixture.backend.find_by_code(&next.code).await.unwrap().unwrap();
    assert_eq!(found, next);
}
