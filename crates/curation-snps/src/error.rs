//! Error types for the SNP tools

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for SNP tool operations
pub type Result<T> = std::result::Result<T, SnpsError>;

#[derive(Error, Debug)]
pub enum SnpsError {
    /// Reading FASTA input or writing key/value output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read template '{}': {source}", path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write rendered query to '{}': {source}. Check that the directory exists and is writable.", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template syntax error or reference to an unknown variable
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}
