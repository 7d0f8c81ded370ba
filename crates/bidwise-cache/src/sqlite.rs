use bidwise_models::document_schema::{DocumentRow, DOCUMENT_TABLE_DDL};
use chrono::Utc;
use rusqlite::Connection;

use crate::error::CacheError;

/// SQLite accessor for extracted document text.
///
/// The database is populated by the external document-extraction pipeline.
/// Bidwise opens it read-only in production.
pub struct DocumentStore {
    conn: Connection,
}

impl DocumentStore {
    /// Open a read-only connection to the document database.
    pub fn open(path: &str) -> Result<Self, CacheError> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Open (or create) a writable database with the schema in place.
    /// Used by extraction tooling and file-backed tests.
    pub fn open_writable(path: &str) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(DOCUMENT_TABLE_DDL)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database with the schema created. Useful for testing.
    pub fn open_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(DOCUMENT_TABLE_DDL)?;
        Ok(Self { conn })
    }

    /// Get a document by link. Returns None if not found or expired.
    pub fn get(&self, link: &str) -> Result<Option<DocumentRow>, CacheError> {
        let now = Utc::now().to_rfc3339();
        let mut stmt = self.conn.prepare_cached(
            "SELECT link, text, source, fetched_at, expires_at \
             FROM documents WHERE link = ?1 AND expires_at > ?2",
        )?;

        let result = stmt.query_row(rusqlite::params![link, now], |row| {
            Ok(DocumentRow {
                link: row.get(0)?,
                text: row.get(1)?,
                source: row.get(2)?,
                fetched_at: row.get(3)?,
                expires_at: row.get(4)?,
            })
        });

        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CacheError::Sqlite(e)),
        }
    }

    /// Number of non-expired documents.
    pub fn live_count(&self) -> Result<usize, CacheError> {
        let now = Utc::now().to_rfc3339();
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE expires_at > ?1",
            rusqlite::params![now],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Insert or replace a document. In production the extraction pipeline
    /// writes directly to SQLite; this is for tooling and tests.
    pub fn insert(&self, row: &DocumentRow) -> Result<(), CacheError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO documents \
             (link, text, source, fetched_at, expires_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                row.link,
                row.text,
                row.source,
                row.fetched_at,
                row.expires_at,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_row(link: &str, text: &str, ttl_seconds: i64) -> DocumentRow {
        let now = Utc::now();
        DocumentRow {
            link: link.to_string(),
            text: text.to_string(),
            source: "pdf".to_string(),
            fetched_at: now.to_rfc3339(),
            expires_at: (now + Duration::seconds(ttl_seconds)).to_rfc3339(),
        }
    }

    #[test]
    fn get_existing_document() {
        let store = DocumentStore::open_in_memory().unwrap();
        store
            .insert(&make_row("https://example.gov.il/a.pdf", "הנכס מושכר", 300))
            .unwrap();

        let result = store.get("https://example.gov.il/a.pdf").unwrap();
        assert_eq!(result.unwrap().text, "הנכס מושכר");
    }

    #[test]
    fn get_missing_document() {
        let store = DocumentStore::open_in_memory().unwrap();
        assert!(store.get("https://example.gov.il/none.pdf").unwrap().is_none());
    }

    #[test]
    fn get_expired_document() {
        let store = DocumentStore::open_in_memory().unwrap();
        store
            .insert(&make_row("https://example.gov.il/old.pdf", "text", -10))
            .unwrap();

        assert!(store.get("https://example.gov.il/old.pdf").unwrap().is_none());
        assert_eq!(store.live_count().unwrap(), 0);
    }

    #[test]
    fn insert_replaces_existing_link() {
        let store = DocumentStore::open_in_memory().unwrap();
        store.insert(&make_row("doc", "first", 300)).unwrap();
        store.insert(&make_row("doc", "second", 300)).unwrap();

        assert_eq!(store.get("doc").unwrap().unwrap().text, "second");
        assert_eq!(store.live_count().unwrap(), 1);
    }

    #[test]
    fn read_only_open_sees_written_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.db");
        let path = path.to_str().unwrap();

        let writer = DocumentStore::open_writable(path).unwrap();
        writer.insert(&make_row("doc", "צו הריסה", 300)).unwrap();

        let reader = DocumentStore::open(path).unwrap();
        assert_eq!(reader.get("doc").unwrap().unwrap().text, "צו הריסה");
    }

    #[test]
    fn read_only_open_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        assert!(DocumentStore::open(path.to_str().unwrap()).is_err());
    }
}
