use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Document fetch error: {0}")]
    Document(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Document fetch timed out after {0} ms")]
    Timeout(u64),

    #[error("Valuation error: {0}")]
    Valuation(String),

    #[error("Invalid risk keyword: {0}")]
    Keyword(#[from] regex::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] bidwise_cache::CacheError),
}
