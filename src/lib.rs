//! wordshard - Sharded Full-Text Index over SQLite
//!
//! Builds and queries a full-text inverted index whose storage is split
//! across five independent SQLite databases: a document store, an
//! occurrence store, and three word stores partitioned by word length.
//!
//! # Features
//!
//! - **Length-partitioned word dictionary**: Words route to a short,
//!   medium, or long store by a pure, data-driven threshold table.
//!
//! - **Lazy shard connections**: Each shard's database is opened on first
//!   use and cached for the process lifetime.
//!
//! - **Per-shard transactional integrity**: Every write commits or rolls
//!   back on its own shard; nothing spans shards atomically, and the
//!   engine is explicit about that gap.
//!
//! - **Term-overlap ranking**: Documents rank by how many distinct query
//!   terms they contain, resolved through the occurrence store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐
//! │ Index Builder │     │ Query Engine │
//! │  (crawler)    │     │  (search)    │
//! └──────┬───────┘     └──────┬───────┘
//!        │    write path       │    read path
//!        ▼                     ▼
//! ┌─────────────────────────────────────┐
//! │          Storage Gateway            │
//! │  schema lifecycle · writes · reads  │
//! └──────────────────┬──────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────┐
//! │         Shard Coordinator           │
//! │   lazy, cached connection per shard │
//! └──┬──────┬──────┬──────┬──────┬──────┘
//!    ▼      ▼      ▼      ▼      ▼
//!  docs   occur  words  words  words
//!   .db    .db   short  medium  long
//! ```
//!
//! # Example
//!
//! ```bash
//! # Build the index (resets the schema first)
//! wordshard index ./corpus --ext .txt
//!
//! # Query it
//! wordshard search hello world
//!
//! # Interactive search loop
//! wordshard search
//! ```

pub mod config;
pub mod error;
pub mod indexer;
pub mod progress;
pub mod search;
#[cfg(feature = "server")]
pub mod server;
pub mod shard;
pub mod store;

pub use config::{CliArgs, IndexConfig};
pub use error::{IndexError, Result, StoreError};
pub use indexer::{Crawler, IndexStats};
pub use search::{SearchEngine, SearchResults};
pub use shard::{ShardCatalog, ShardCoordinator, ShardId};
pub use store::StorageGateway;
