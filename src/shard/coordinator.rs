//! Lazy per-shard connection management
//!
//! The coordinator maps a `ShardId` to a live rusqlite connection. A
//! connection is opened on first request for that shard and cached for the
//! coordinator's lifetime; a failed open is fatal to the calling operation
//! and is never retried.
//!
//! The coordinator is exclusively owned (`&mut self` everywhere). rusqlite
//! connections are not `Sync`, so sharing one coordinator across threads is
//! a compile error rather than a latent race; callers that need concurrency
//! wrap the owning gateway in a mutex.

use crate::error::{StoreError, StoreResult};
use crate::shard::route::{word_shard, ShardId};
use rusqlite::Connection;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// How long a statement waits on a locked shard file before failing.
/// Bounds the damage of a hung shard: the caller gets an error instead of
/// blocking forever.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Maps each shard to its backing database file
#[derive(Debug, Clone)]
pub struct ShardCatalog {
    /// Directory holding one SQLite file per shard
    dir: PathBuf,
}

impl ShardCatalog {
    /// Create a catalog rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Database file path for a shard
    pub fn path(&self, shard: ShardId) -> PathBuf {
        self.dir.join(shard.file_name())
    }

    /// The catalog's root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Deterministic routing from shard identity to a cached connection
pub struct ShardCoordinator {
    catalog: ShardCatalog,
    connections: HashMap<ShardId, Connection>,
}

impl ShardCoordinator {
    /// Create a coordinator; no connection is opened yet
    pub fn new(catalog: ShardCatalog) -> Self {
        Self {
            catalog,
            connections: HashMap::new(),
        }
    }

    /// The catalog this coordinator routes through
    pub fn catalog(&self) -> &ShardCatalog {
        &self.catalog
    }

    /// Connection to the document store
    pub fn document_shard(&mut self) -> StoreResult<&Connection> {
        self.connection(ShardId::Documents)
    }

    /// Connection to the occurrence store
    pub fn occurrence_shard(&mut self) -> StoreResult<&Connection> {
        self.connection(ShardId::Occurrences)
    }

    /// Connection to the word store responsible for `word`
    pub fn word_shard(&mut self, word: &str) -> StoreResult<&Connection> {
        self.connection(word_shard(word))
    }

    /// Connection for an explicit shard, opening and caching on first use
    pub fn connection(&mut self, shard: ShardId) -> StoreResult<&Connection> {
        let path = self.catalog.path(shard);
        match self.connections.entry(shard) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!("Opening shard '{}' at {}", shard, path.display());
                let conn = open_shard(shard, &path)?;
                Ok(entry.insert(conn))
            }
        }
    }
}

/// Open one shard database and apply connection settings
fn open_shard(shard: ShardId, path: &Path) -> StoreResult<Connection> {
    let conn = Connection::open(path).map_err(|source| StoreError::ConnectionFailed {
        shard: shard.name(),
        path: path.to_path_buf(),
        source,
    })?;

    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|source| StoreError::ConnectionFailed {
            shard: shard.name(),
            path: path.to_path_buf(),
            source,
        })?;

    // Referential integrity across shards is a write-order convention, not a
    // storage-layer constraint (see schema.rs / spec §3). The bundled SQLite
    // build defaults foreign-key enforcement ON, so disable it explicitly to
    // honor the nominal-FK contract.
    conn.pragma_update(None, "foreign_keys", false)
        .map_err(|source| StoreError::ConnectionFailed {
            shard: shard.name(),
            path: path.to_path_buf(),
            source,
        })?;

    Ok(conn)
}
