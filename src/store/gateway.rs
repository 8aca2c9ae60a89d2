//! Cross-shard reads and writes
//!
//! The gateway provides local (per-shard) transactional integrity only; no
//! operation spans shards atomically. In particular, the word and
//! occurrence writes for one document commit on different shards, so a
//! crash between them leaves that document with partial index data. That
//! gap is part of the storage contract - callers are expected to rebuild
//! from a schema reset rather than repair in place.

use crate::error::StoreResult;
use crate::shard::{ShardCatalog, ShardCoordinator, ShardId};
use crate::store::schema;
use rusqlite::params;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Schema lifecycle and CRUD across all shards
pub struct StorageGateway {
    coordinator: ShardCoordinator,
}

impl StorageGateway {
    /// Create a gateway over the given shard catalog
    pub fn new(catalog: ShardCatalog) -> Self {
        Self {
            coordinator: ShardCoordinator::new(catalog),
        }
    }

    /// Drop all tables on every shard
    ///
    /// Each shard's drops run independently; if a later shard fails,
    /// earlier shards stay dropped. A failed reset therefore requires
    /// verifying every shard before reuse.
    pub fn reset_schema(&mut self) -> StoreResult<()> {
        for shard in ShardId::ALL {
            debug!("Dropping tables on shard '{}'", shard);
            let conn = self.coordinator.connection(shard)?;
            schema::drop_tables(conn)?;
        }
        info!("Schema dropped on all {} shards", ShardId::ALL.len());
        Ok(())
    }

    /// Drop and recreate all tables on every shard
    ///
    /// Same per-shard independence as [`reset_schema`](Self::reset_schema):
    /// a mid-iteration failure can leave shards with mixed schema states.
    pub fn recreate_schema(&mut self) -> StoreResult<()> {
        for shard in ShardId::ALL {
            debug!("Recreating tables on shard '{}'", shard);
            let conn = self.coordinator.connection(shard)?;
            schema::drop_tables(conn)?;
            schema::create_tables(conn)?;
        }
        info!("Schema recreated on all {} shards", ShardId::ALL.len());
        Ok(())
    }

    /// Insert one document row
    pub fn insert_document(&mut self, id: i32, location: &str) -> StoreResult<()> {
        let conn = self.coordinator.document_shard()?;
        let mut stmt =
            conn.prepare_cached("INSERT INTO Documents(id, location) VALUES(?1, ?2)")?;
        stmt.execute(params![id, location])?;
        Ok(())
    }

    /// Insert a batch of words, each routed to its shard by length
    ///
    /// Every entry gets its own single-statement transaction; a failure
    /// rolls back only that insert and surfaces immediately. Entries
    /// already committed stay committed.
    pub fn insert_words(&mut self, words: &HashMap<String, i32>) -> StoreResult<()> {
        for (text, &id) in words {
            let conn = self.coordinator.word_shard(text)?;
            let tx = conn.unchecked_transaction()?;
            {
                let mut stmt = tx.prepare_cached("INSERT INTO Words(id, text) VALUES(?1, ?2)")?;
                stmt.execute(params![id, text])?;
            }
            tx.commit()?;
        }
        Ok(())
    }

    /// Insert all occurrence edges for one document
    ///
    /// One transaction on the occurrence shard: all rows commit together or
    /// none do.
    pub fn insert_occurrences(&mut self, doc_id: i32, word_ids: &HashSet<i32>) -> StoreResult<()> {
        let conn = self.coordinator.occurrence_shard()?;
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO Occurrences(wordId, docId) VALUES(?1, ?2)")?;
            for &word_id in word_ids {
                stmt.execute(params![word_id, doc_id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Rank documents by how many of the given words they contain
    ///
    /// Returns `(doc_id, match_count)` pairs ordered by count descending.
    /// Tie order between equal counts is whatever the shard returns. An
    /// empty id list yields an empty result without touching the shard.
    pub fn rank_documents(&mut self, word_ids: &[i32]) -> StoreResult<Vec<(i32, i64)>> {
        if word_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT docId, COUNT(wordId) AS count FROM Occurrences \
             WHERE wordId IN ({}) GROUP BY docId ORDER BY count DESC",
            id_list(word_ids)
        );

        let conn = self.coordinator.occurrence_shard()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Load the entire word dictionary
    ///
    /// Full scan of every word shard, unioned into one map. Cost grows
    /// linearly with dictionary size; there is no caching here - callers
    /// that need a stable view hold their own snapshot.
    pub fn all_words(&mut self) -> StoreResult<HashMap<String, i32>> {
        let mut words = HashMap::new();
        for shard in ShardId::WORDS {
            let conn = self.coordinator.connection(shard)?;
            let mut stmt = conn.prepare_cached("SELECT id, text FROM Words")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, i32>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (id, text) = row?;
                words.insert(text, id);
            }
        }
        debug!("Loaded {} words from {} shards", words.len(), ShardId::WORDS.len());
        Ok(words)
    }

    /// Resolve document ids to their locations
    ///
    /// Returns `(id, location)` pairs in the shard's natural scan order,
    /// NOT the order of `doc_ids` - callers must pair by id. An empty id
    /// list yields an empty result without touching the shard.
    pub fn document_locations(&mut self, doc_ids: &[i32]) -> StoreResult<Vec<(i32, String)>> {
        if doc_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, location FROM Documents WHERE id IN ({})",
            id_list(doc_ids)
        );

        let conn = self.coordinator.document_shard()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let locations: Vec<(i32, String)> = rows.collect::<Result<Vec<_>, _>>()?;

        if locations.len() < doc_ids.len() {
            warn!(
                "Resolved {} of {} document ids",
                locations.len(),
                doc_ids.len()
            );
        }
        Ok(locations)
    }
}

/// Format integer ids as a SQL IN-list body
fn id_list(ids: &[i32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fresh_gateway(dir: &std::path::Path) -> StorageGateway {
        let mut gateway = StorageGateway::new(ShardCatalog::new(dir));
        gateway.recreate_schema().unwrap();
        gateway
    }

    #[test]
    fn test_id_list_formatting() {
        assert_eq!(id_list(&[1]), "1");
        assert_eq!(id_list(&[1, 2, 42]), "1,2,42");
    }

    #[test]
    fn test_words_land_on_length_shards() {
        let dir = tempdir().unwrap();
        let mut gateway = fresh_gateway(dir.path());

        let mut words = HashMap::new();
        words.insert("cat".to_string(), 1);
        words.insert("internationalization".to_string(), 2); // 20 chars
        words.insert("x".repeat(25), 3);
        gateway.insert_words(&words).unwrap();

        // The union sees all three, each shard holds exactly one
        let all = gateway.all_words().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all["cat"], 1);

        for shard in ShardId::WORDS {
            let conn = gateway.coordinator.connection(shard).unwrap();
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM Words", [], |row| row.get(0))
                .unwrap();
            assert_eq!(count, 1, "shard {} should hold one word", shard);
        }
    }

    #[test]
    fn test_duplicate_word_id_is_surfaced() {
        let dir = tempdir().unwrap();
        let mut gateway = fresh_gateway(dir.path());

        let mut first = HashMap::new();
        first.insert("cat".to_string(), 1);
        gateway.insert_words(&first).unwrap();

        // Same id on the same shard violates the primary key
        let mut second = HashMap::new();
        second.insert("dog".to_string(), 1);
        assert!(gateway.insert_words(&second).is_err());

        // The failed insert did not land
        let all = gateway.all_words().unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_occurrence_batch_commits_together() {
        let dir = tempdir().unwrap();
        let mut gateway = fresh_gateway(dir.path());

        let ids: HashSet<i32> = [1, 2, 3].into_iter().collect();
        gateway.insert_occurrences(7, &ids).unwrap();

        let ranked = gateway.rank_documents(&[1, 2, 3]).unwrap();
        assert_eq!(ranked, vec![(7, 3)]);
    }

    #[test]
    fn test_rank_empty_input() {
        let dir = tempdir().unwrap();
        let mut gateway = fresh_gateway(dir.path());
        assert!(gateway.rank_documents(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_document_locations_pair_by_id() {
        let dir = tempdir().unwrap();
        let mut gateway = fresh_gateway(dir.path());

        gateway.insert_document(1, "/corpus/a.txt").unwrap();
        gateway.insert_document(2, "/corpus/b.txt").unwrap();

        // Request in reverse order; results carry ids so order is irrelevant
        let locations = gateway.document_locations(&[2, 1]).unwrap();
        let by_id: HashMap<i32, String> = locations.into_iter().collect();
        assert_eq!(by_id[&1], "/corpus/a.txt");
        assert_eq!(by_id[&2], "/corpus/b.txt");

        assert!(gateway.document_locations(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_recreate_clears_rows() {
        let dir = tempdir().unwrap();
        let mut gateway = fresh_gateway(dir.path());

        gateway.insert_document(1, "/corpus/a.txt").unwrap();
        gateway.recreate_schema().unwrap();

        assert!(gateway.document_locations(&[1]).unwrap().is_empty());
        assert!(gateway.all_words().unwrap().is_empty());
    }
}
