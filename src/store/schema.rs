//! Shard schema definitions and lifecycle
//!
//! Every shard carries the same three tables; a shard simply never receives
//! writes for entity types it does not hold. The occurrence table declares
//! foreign keys into Words and Documents, so drops run dependents-first.
//! Note the foreign keys are nominal: words and documents live on other
//! shards, so referential integrity is a write-order convention, not a
//! constraint the storage layer can enforce.

use crate::error::StoreResult;
use rusqlite::Connection;

const CREATE_DOCUMENTS_TABLE: &str =
    "CREATE TABLE Documents(id INTEGER PRIMARY KEY, location VARCHAR(500))";

const CREATE_WORDS_TABLE: &str = "CREATE TABLE Words(id INTEGER PRIMARY KEY, text VARCHAR(500))";

const CREATE_OCCURRENCES_TABLE: &str = "CREATE TABLE Occurrences(wordId INTEGER, docId INTEGER, \
     FOREIGN KEY (wordId) REFERENCES Words(id), \
     FOREIGN KEY (docId) REFERENCES Documents(id))";

/// Drop statements, dependents first
const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS Occurrences",
    "DROP TABLE IF EXISTS Words",
    "DROP TABLE IF EXISTS Documents",
];

/// Drop all index tables on one shard
pub fn drop_tables(conn: &Connection) -> StoreResult<()> {
    for sql in DROP_TABLES {
        execute_in_transaction(conn, sql)?;
    }
    Ok(())
}

/// Create all index tables on one shard
pub fn create_tables(conn: &Connection) -> StoreResult<()> {
    execute_in_transaction(conn, CREATE_DOCUMENTS_TABLE)?;
    execute_in_transaction(conn, CREATE_WORDS_TABLE)?;
    execute_in_transaction(conn, CREATE_OCCURRENCES_TABLE)?;
    Ok(())
}

/// Check whether a table exists on this shard
pub fn table_exists(conn: &Connection, name: &str) -> StoreResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Run one statement inside its own transaction
fn execute_in_transaction(conn: &Connection, sql: &str) -> StoreResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(sql, [])?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        assert!(table_exists(&conn, "Documents").unwrap());
        assert!(table_exists(&conn, "Words").unwrap());
        assert!(table_exists(&conn, "Occurrences").unwrap());
    }

    #[test]
    fn test_drop_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Dropping with no tables present must succeed
        drop_tables(&conn).unwrap();

        create_tables(&conn).unwrap();
        drop_tables(&conn).unwrap();
        assert!(!table_exists(&conn, "Documents").unwrap());

        // Drop-then-create twice leaves a usable schema
        create_tables(&conn).unwrap();
        drop_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
        assert!(table_exists(&conn, "Occurrences").unwrap());
    }
}
