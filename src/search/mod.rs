//! Query engine
//!
//! Resolves free-text terms against a word-dictionary snapshot and returns
//! ranked document locations.

pub mod engine;

pub use engine::{SearchEngine, SearchHit, SearchResults, DEFAULT_RESULT_LIMIT};
