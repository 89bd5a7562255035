//! Curation SNPs Library
//!
//! Building blocks for an annotated "all possible SNPs" table.
//!
//! - **FASTA conversion**: reference sequences to positional key/value lines ([`fasta`])
//! - **Query rendering**: the annotation JOIN and its sanity check ([`sql`])
//!
//! # Example
//!
//! ```
//! use curation_snps::fasta::fasta_to_kv;
//!
//! let mut out = Vec::new();
//! fasta_to_kv(">chr22\nCAAGG\nTTAGC\n".as_bytes(), &mut out).unwrap();
//! assert_eq!(out, b">chr22>0>CAAGG\n>chr22>5>TTAGC\n");
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod fasta;
pub mod sql;

// Re-export commonly used types
pub use error::{Result, SnpsError};
pub use fasta::{fasta_to_kv, ConvertStats};
pub use sql::{GenomeBuild, QueryReplacements, Templates};
