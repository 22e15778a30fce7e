use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};
use stubby_shortener::{Allocation, IdBase};

pub const STORAGE_BACKEND_ENV: &str = "STUBBY_STORAGE_BACKEND";
pub const DATABASE_URL_ENV: &str = "STUBBY_DATABASE_URL";
pub const BASE_URL_ENV: &str = "STUBBY_BASE_URL";
pub const ID_BASE_ENV: &str = "STUBBY_ID_BASE";
pub const ALLOCATION_ENV: &str = "STUBBY_ALLOCATION";
pub const TIMEOUT_MS_ENV: &str = "STUBBY_TIMEOUT_MS";
pub const LOG_JSON_ENV: &str = "STUBBY_LOG_JSON";

pub const DEFAULT_DATABASE_URL: &str = "sqlite://urls.db";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AllocationArg {
    #[value(name = "in-process")]
    InProcess,
    #[value(name = "backend")]
    Backend,
}

impl From<AllocationArg> for Allocation {
    fn from(value: AllocationArg) -> Self {
        match value {
            AllocationArg::InProcess => Allocation::InProcess,
            AllocationArg::Backend => Allocation::Backend,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdBaseArg {
    #[value(name = "0")]
    Zero,
    #[value(name = "1")]
    One,
}

impl From<IdBaseArg> for IdBase {
    fn from(value: IdBaseArg) -> Self {
        match value {
            IdBaseArg::Zero => IdBase::Zero,
            IdBaseArg::One => IdBase::One,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "stubby", about = "Create and resolve short URL codes")]
pub struct CLI {
    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    /// sqlx connection string for the sqlite or mysql backend.
    #[arg(long, env = DATABASE_URL_ENV, default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Public address short codes are appended to.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// First identifier of an empty store.
    #[arg(long, env = ID_BASE_ENV, value_enum, default_value_t = IdBaseArg::One)]
    pub id_base: IdBaseArg,

    #[arg(
        long,
        env = ALLOCATION_ENV,
        value_enum,
        default_value_t = AllocationArg::InProcess
    )]
    pub allocation: AllocationArg,

    /// Bound on each storage call, in milliseconds. 0 disables the bound.
    #[arg(long, env = TIMEOUT_MS_ENV, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Emit logs as JSON lines.
    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a URL and print its short code.
    Shorten { url: String },
    /// Print the URL stored under a short code.
    Resolve { code: String },
}
