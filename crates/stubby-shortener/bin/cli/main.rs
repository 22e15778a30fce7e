mod cli;

use crate::cli::{Command, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::time::Duration;
use stubby_shortener::{MappingStore, Shortener, StoreError, StoreSettings};
use stubby_storage::{Backend, InMemoryBackend, MySqlBackend, SqliteBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Output {
    Created { code: String, short_url: String },
    Resolved { code: String, url: String },
    Missing { code: String, error: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_json);

    info!(
        storage_backend = %config.storage,
        allocation = ?config.allocation,
        "starting stubby"
    );

    let settings = StoreSettings::builder()
        .id_base(config.id_base.into())
        .allocation(config.allocation.into())
        .operation_timeout((config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms)))
        .build();

    let shortener: Box<dyn Shortener> = match config.storage {
        StorageBackendArg::InMemory => open(InMemoryBackend::new(), settings).await?,
        StorageBackendArg::Sqlite => {
            let backend = SqliteBackend::connect(&config.database_url)
                .await
                .context("failed to open sqlite database")?;
            backend.ensure_schema().await?;
            open(backend, settings).await?
        }
        StorageBackendArg::Mysql => {
            let backend = MySqlBackend::connect(&config.database_url)
                .await
                .context("failed to connect to mysql")?;
            backend.ensure_schema().await?;
            open(backend, settings).await?
        }
    };

    let output = match config.command {
        Command::Shorten { url } => {
            let code = shortener.create(&url).await?;
            Output::Created {
                short_url: code.to_url(&config.base_url),
                code: code.to_string(),
            }
        }
        Command::Resolve { code } => match shortener.resolve(&code).await {
            Ok(url) => Output::Resolved { code, url },
            Err(err) if err.is_not_found() => Output::Missing {
                code,
                error: err.to_string(),
            },
            Err(err) => return Err(err.into()),
        },
    };

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

async fn open<B: Backend>(
    backend: B,
    settings: StoreSettings,
) -> Result<Box<dyn Shortener>, StoreError> {
    let store = MappingStore::initialize(backend, settings).await?;
    Ok(Box::new(store))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
