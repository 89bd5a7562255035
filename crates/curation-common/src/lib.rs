//! Curation Common Library
//!
//! Shared types, utilities, and error handling for the curation tools.
//!
//! # Overview
//!
//! This crate provides common functionality used across all workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: `tracing` subscriber setup shared by every binary
//! - **Types**: Shared domain types such as [`types::TableRef`]
//!
//! # Example
//!
//! ```no_run
//! use curation_common::{Result, types::TableRef};
//!
//! fn describe(name: &str) -> Result<()> {
//!     let table = TableRef::parse(name)?;
//!     println!("project={} dataset={} table={}", table.project_id, table.dataset_id, table.table_id);
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CurationError, Result};
