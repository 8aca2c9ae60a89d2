//! Shard identity, routing, and connection management
//!
//! The index is split across five independent SQLite databases: one for
//! documents, one for occurrences, and three word stores partitioned by
//! word length. This module provides:
//! - `ShardId` and the pure length-based routing function
//! - `ShardCatalog`, mapping each shard to its database file
//! - `ShardCoordinator`, which opens connections lazily and caches them

pub mod coordinator;
pub mod route;

pub use coordinator::{ShardCatalog, ShardCoordinator};
pub use route::{word_shard, ShardId};
