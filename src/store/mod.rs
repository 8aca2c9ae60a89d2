//! Cross-shard storage for words, documents, and occurrences
//!
//! The `StorageGateway` owns the shard coordinator and is the only code
//! that talks SQL to the shards. Schema lifecycle lives in `schema`, all
//! reads and writes in `gateway`.

pub mod gateway;
pub mod schema;

pub use gateway::StorageGateway;
