//! Index store port definition

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during index store operations
#[derive(Debug, Error)]
pub enum IndexError {
    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Connection to the store failed
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Port for the small key/value store holding the serialized gallery index
#[async_trait]
pub trait IndexStorePort: Send + Sync {
    /// Get the value stored under `key`, or `None` if the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>, IndexError>;

    /// Store `value` under `key`, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> Result<(), IndexError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_display() {
        let err = IndexError::DatabaseError("disk I/O error".to_string());
        assert!(err.to_string().contains("disk I/O error"));
    }
}
