//! HTTP facade over the storage boundary
//!
//! Exposes the gateway's operations (dictionary reads, document/word/
//! occurrence writes, schema lifecycle) as JSON endpoints so the index can
//! be built and queried remotely. The gateway is synchronous and
//! exclusively owned, so handlers serialize access through a mutex.

pub mod routes;

pub use routes::{build_router, serve, AppState};
