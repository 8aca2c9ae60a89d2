//! Index-build pipeline
//!
//! Turns a directory tree of text files into word, document, and
//! occurrence rows. `tokenize` is the pure text-splitting step; `crawler`
//! owns id assignment and drives the storage gateway.

pub mod crawler;
pub mod tokenize;

pub use crawler::{CrawlProgress, Crawler, IndexStats};
pub use tokenize::extract_words;
