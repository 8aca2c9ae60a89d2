//! Term resolution and ranked search
//!
//! The engine loads the whole word dictionary once at construction and
//! holds it as an immutable snapshot: words indexed afterwards are
//! invisible until a new engine is built. That is intended behavior for
//! the reset-then-reindex workflow, where queries run against a finished
//! index.

use crate::error::StoreResult;
use crate::store::StorageGateway;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How many ranked documents a search resolves to locations by default
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "server", derive(serde::Serialize))]
pub struct SearchHit {
    /// Document id on the document shard
    pub doc_id: i32,

    /// Document location as recorded at index time
    pub location: String,

    /// Number of distinct query terms the document contains
    pub matched: i64,
}

/// Outcome of one search
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "server", derive(serde::Serialize))]
pub struct SearchResults {
    /// Ranked hits, best first, at most the requested limit
    pub hits: Vec<SearchHit>,

    /// Query terms absent from the dictionary, reported rather than failed
    pub ignored: Vec<String>,

    /// Total matching documents before the limit was applied
    pub total_matches: usize,

    /// Time spent ranking and resolving
    #[cfg_attr(feature = "server", serde(skip))]
    pub elapsed: Duration,
}

/// Search engine over a word-dictionary snapshot
pub struct SearchEngine {
    words: HashMap<String, i32>,
}

impl SearchEngine {
    /// Build an engine by snapshotting the full word dictionary
    pub fn new(gateway: &mut StorageGateway) -> StoreResult<Self> {
        let words = gateway.all_words()?;
        info!("Search engine loaded {} words", words.len());
        Ok(Self { words })
    }

    /// Number of words in the snapshot
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Exact-match lookup of one term in the snapshot
    pub fn resolve_term(&self, term: &str) -> Option<i32> {
        self.words.get(term).copied()
    }

    /// Rank documents for the given terms and resolve the top hits
    ///
    /// Unknown terms are dropped and reported in `ignored`. An empty or
    /// fully-unknown query returns empty results without contacting any
    /// shard. Locations are paired to ranked ids by id, never by position.
    pub fn search(
        &self,
        gateway: &mut StorageGateway,
        terms: &[String],
        limit: usize,
    ) -> StoreResult<SearchResults> {
        let start = Instant::now();

        let mut word_ids = Vec::new();
        let mut ignored = Vec::new();
        for term in terms {
            match self.resolve_term(term) {
                Some(id) => word_ids.push(id),
                None => ignored.push(term.clone()),
            }
        }

        if word_ids.is_empty() {
            return Ok(SearchResults {
                hits: Vec::new(),
                ignored,
                total_matches: 0,
                elapsed: start.elapsed(),
            });
        }

        let ranked = gateway.rank_documents(&word_ids)?;
        let total_matches = ranked.len();

        let top: Vec<(i32, i64)> = ranked.into_iter().take(limit).collect();
        let top_ids: Vec<i32> = top.iter().map(|&(doc_id, _)| doc_id).collect();

        let locations: HashMap<i32, String> =
            gateway.document_locations(&top_ids)?.into_iter().collect();

        let hits = top
            .into_iter()
            .filter_map(|(doc_id, matched)| {
                locations.get(&doc_id).map(|location| SearchHit {
                    doc_id,
                    location: location.clone(),
                    matched,
                })
            })
            .collect();

        debug!(
            terms = terms.len(),
            resolved = word_ids.len(),
            matches = total_matches,
            "Search complete"
        );

        Ok(SearchResults {
            hits,
            ignored,
            total_matches,
            elapsed: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shard::ShardCatalog;
    use std::collections::HashSet;
    use tempfile::tempdir;

    /// Schema + two documents: d1 holds {w1,w2}, d2 holds {w1}
    fn seeded_gateway(dir: &std::path::Path) -> StorageGateway {
        let mut gateway = StorageGateway::new(ShardCatalog::new(dir));
        gateway.recreate_schema().unwrap();

        let mut words = HashMap::new();
        words.insert("cat".to_string(), 1);
        words.insert("dog".to_string(), 2);
        gateway.insert_words(&words).unwrap();

        gateway.insert_document(1, "/corpus/both.txt").unwrap();
        gateway.insert_document(2, "/corpus/cat-only.txt").unwrap();

        gateway
            .insert_occurrences(1, &HashSet::from([1, 2]))
            .unwrap();
        gateway.insert_occurrences(2, &HashSet::from([1])).unwrap();

        gateway
    }

    #[test]
    fn test_ranking_orders_by_match_count() {
        let dir = tempdir().unwrap();
        let mut gateway = seeded_gateway(dir.path());
        let engine = SearchEngine::new(&mut gateway).unwrap();

        let terms = vec!["cat".to_string(), "dog".to_string()];
        let results = engine
            .search(&mut gateway, &terms, DEFAULT_RESULT_LIMIT)
            .unwrap();

        assert_eq!(results.total_matches, 2);
        assert_eq!(results.hits.len(), 2);
        assert_eq!(results.hits[0].doc_id, 1);
        assert_eq!(results.hits[0].matched, 2);
        assert_eq!(results.hits[0].location, "/corpus/both.txt");
        assert_eq!(results.hits[1].doc_id, 2);
        assert_eq!(results.hits[1].matched, 1);
    }

    #[test]
    fn test_unknown_terms_are_ignored_not_fatal() {
        let dir = tempdir().unwrap();
        let mut gateway = seeded_gateway(dir.path());
        let engine = SearchEngine::new(&mut gateway).unwrap();

        let terms = vec!["cat".to_string(), "xyzzy".to_string()];
        let results = engine
            .search(&mut gateway, &terms, DEFAULT_RESULT_LIMIT)
            .unwrap();

        assert_eq!(results.ignored, vec!["xyzzy".to_string()]);
        // Same hits as searching ["cat"] alone
        assert_eq!(results.hits.len(), 2);
        assert!(results.hits.iter().all(|hit| hit.matched == 1));
    }

    #[test]
    fn test_empty_query_returns_empty() {
        let dir = tempdir().unwrap();
        let mut gateway = seeded_gateway(dir.path());
        let engine = SearchEngine::new(&mut gateway).unwrap();

        let results = engine
            .search(&mut gateway, &[], DEFAULT_RESULT_LIMIT)
            .unwrap();
        assert!(results.hits.is_empty());
        assert!(results.ignored.is_empty());
        assert_eq!(results.total_matches, 0);
    }

    #[test]
    fn test_limit_truncates_but_total_does_not() {
        let dir = tempdir().unwrap();
        let mut gateway = seeded_gateway(dir.path());
        let engine = SearchEngine::new(&mut gateway).unwrap();

        let terms = vec!["cat".to_string()];
        let results = engine.search(&mut gateway, &terms, 1).unwrap();
        assert_eq!(results.hits.len(), 1);
        assert_eq!(results.total_matches, 2);
    }

    #[test]
    fn test_snapshot_is_not_refreshed() {
        let dir = tempdir().unwrap();
        let mut gateway = seeded_gateway(dir.path());
        let engine = SearchEngine::new(&mut gateway).unwrap();

        // A word indexed after construction is invisible to this engine
        let mut late = HashMap::new();
        late.insert("ferret".to_string(), 3);
        gateway.insert_words(&late).unwrap();

        assert_eq!(engine.resolve_term("ferret"), None);
        assert_eq!(
            SearchEngine::new(&mut gateway).unwrap().resolve_term("ferret"),
            Some(3)
        );
    }
}
