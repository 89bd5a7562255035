//! Error types shared by the curation tools

use thiserror::Error;

/// Result type alias for shared operations
pub type Result<T> = std::result::Result<T, CurationError>;

/// Main error type for shared operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurationError {
    #[error("Invalid table name '{0}': expected PROJECT_ID.DATASET_NAME.TABLE_NAME")]
    InvalidTableName(String),
}
