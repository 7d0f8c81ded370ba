/// The SQLite table the document-extraction pipeline writes extracted tender
/// text into, keyed by the document's link. Bidwise only reads it.
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS documents (
///     link        TEXT PRIMARY KEY,
///     text        TEXT NOT NULL,
///     source      TEXT NOT NULL,
///     fetched_at  TEXT NOT NULL,
///     expires_at  TEXT NOT NULL
/// );
///
/// CREATE INDEX IF NOT EXISTS idx_documents_expires ON documents(expires_at);
/// ```
pub const DOCUMENT_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS documents (
    link        TEXT PRIMARY KEY,
    text        TEXT NOT NULL,
    source      TEXT NOT NULL,
    fetched_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_expires ON documents(expires_at);
";

/// A raw document row as read from SQLite. Timestamps are RFC 3339.
#[derive(Debug, Clone)]
pub struct DocumentRow {
    pub link: String,
    pub text: String,
    /// Which extractor produced the text (e.g. "pdf").
    pub source: String,
    pub fetched_at: String,
    pub expires_at: String,
}

/// Normalize a document link for use as a lookup key.
pub fn document_key(link: &str) -> String {
    link.trim().to_string()
}
