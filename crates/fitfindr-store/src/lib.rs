//! SQLite-backed store for venues and events.
//!
//! One database file holds both tables. Writes are single statements, and a
//! seed import runs inside one transaction.

pub mod events;
pub mod locations;
mod rows;
mod schema;
pub mod seed;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

pub use events::EventSearch;
pub use locations::{GeocodeSelection, LocationSearch};
pub use seed::SeedSummary;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("location {0} not found")]
    LocationNotFound(Uuid),

    #[error("failed to create store directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Venues and events persisted in a `SQLite` database.
///
/// The connection is not `Sync`; share the store behind a lock.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Open the database at `path`, creating the file, its parent
    /// directories and the schema as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CreateDir`] if the parent directory cannot be
    /// created, or [`StoreError::Database`] if the file is not a usable
    /// database.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let store = Self::init(Connection::open(&path)?, path)?;
        tracing::debug!(path = %store.path.display(), "store opened");
        Ok(store)
    }

    /// An empty store that lives only as long as the value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, PathBuf::from(":memory:"))
    }

    fn init(conn: Connection, path: PathBuf) -> Result<Self, StoreError> {
        schema::migrate(&conn)?;
        Ok(Self { conn, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Case-insensitive substring match. A blank needle matches everything.
pub(crate) fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}
