//! Remote API clients
//!
//! HTTP clients for Google Genomics, BigQuery and Cloud Storage, each behind
//! a narrow trait so the workflow can run against fakes.

pub mod auth;
pub mod bigquery;
pub mod client;
pub mod endpoints;
pub mod genomics;
pub mod types;

pub use bigquery::{BigQueryClient, WarehouseApi};
pub use client::ApiClient;
pub use genomics::{GenomicsApi, GenomicsClient};
pub use types::*;
