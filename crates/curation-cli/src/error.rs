//! Error types for the curation CLI
//!
//! Errors carry clear, actionable messages. Every hard failure of the upload
//! workflow maps to exactly one variant here so callers (and tests) can
//! match on what went wrong.

use crate::upload::WorkflowStep;
use curation_common::CurationError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Comprehensive error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Remote API returned an error status or an unexpected payload
    #[error("Remote API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// More than one remote record matched a name-or-id lookup
    #[error("Found multiple {kind}s matching '{name}'. Use the {kind} id instead of its name, or pass --new-{kind} to create a fresh one.")]
    AmbiguousName { kind: &'static str, name: String },

    /// A long-running remote operation completed without success
    #[error("{step} operation failed ({operation}). Inspect it with 'gcloud alpha genomics operations describe {operation}'.")]
    OperationFailed {
        step: WorkflowStep,
        operation: String,
    },

    /// Status queries kept failing after every retry attempt
    #[error("Gave up querying operation '{operation}' after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: Box<CliError>,
    },

    /// A VCF header line did not match its declared pattern
    #[error("Failed to parse line {line_no}: {line}")]
    HeaderParse { line_no: usize, line: String },

    /// The header ended before the #CHROM line was found
    #[error("VCF header of '{0}' is truncated: no #CHROM line found")]
    TruncatedHeader(String),

    /// The destination table has no nested `call` record
    #[error("Table '{0}' has no 'call' field. Is it a variants table exported from Genomics?")]
    MissingCallField(String),

    /// No file or object matched a source path
    #[error("No files match '{0}'. Verify the path and wildcard pattern.")]
    SourceNotFound(String),

    /// Source path uses an unsupported scheme or pattern
    #[error("Invalid source path '{0}': {1}")]
    InvalidSourcePath(String, String),

    /// Could not obtain an OAuth access token
    #[error("Authentication failed: {0}. Set CURATION_ACCESS_TOKEN or run 'gcloud auth application-default login'.")]
    Auth(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or command-line flags.")]
    Config(String),

    /// Shared error from curation-common
    #[error(transparent)]
    Common(#[from] CurationError),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and that the path exists.")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection and API endpoints.")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an ambiguous-name error
    pub fn ambiguous(kind: &'static str, name: impl Into<String>) -> Self {
        Self::AmbiguousName {
            kind,
            name: name.into(),
        }
    }

    /// Create an operation failure error
    pub fn operation_failed(step: WorkflowStep, operation: impl Into<String>) -> Self {
        Self::OperationFailed {
            step,
            operation: operation.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a header parse error
    pub fn header_parse(line_no: usize, line: impl Into<String>) -> Self {
        Self::HeaderParse {
            line_no,
            line: line.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_failed_message_names_operation() {
        let err = CliError::operation_failed(WorkflowStep::AwaitImports, "operations/abc");
        let message = err.to_string();
        assert!(message.contains("operations/abc"));
        assert!(message.starts_with("import"));
    }

    #[test]
    fn test_header_parse_message_has_line_number() {
        let err = CliError::header_parse(12, "##INFO=<broken>");
        assert_eq!(err.to_string(), "Failed to parse line 12: ##INFO=<broken>");
    }

    #[test]
    fn test_ambiguous_message() {
        let err = CliError::ambiguous("dataset", "platinum");
        assert!(err.to_string().contains("multiple datasets matching 'platinum'"));
    }
}
