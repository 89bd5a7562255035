//! Curation CLI Library
//!
//! Loads VCF files into BigQuery through the Google Genomics API.
//!
//! # Overview
//!
//! - **Upload**: import VCFs into a variant set and export it to a table (`curation upload`)
//! - **Schema descriptions**: describe a variants table's columns from a VCF header (`curation update-schema`)
//!
//! Remote services sit behind the [`api::GenomicsApi`], [`api::WarehouseApi`]
//! and [`storage::SourceStore`] traits.

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod schema;
pub mod storage;
pub mod upload;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::{Args, Parser, Subcommand};
use curation_common::types::TableRef;

/// curation - load VCF files into BigQuery
#[derive(Parser, Debug)]
#[command(name = "curation")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the full command reference as Markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,

    /// OAuth access token (defaults to gcloud application-default credentials)
    #[arg(long, env = "CURATION_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub access_token: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import VCFs into Genomics, export them to BigQuery and describe the columns
    Upload(UploadArgs),

    /// Describe the columns of an exported variants table from a VCF header
    UpdateSchema(UpdateSchemaArgs),
}

/// Arguments for `curation upload`
#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Source VCF files (local or gs://), optionally gzipped; `*` wildcards allowed
    #[arg(long = "source-vcf", required = true, num_args = 1..)]
    pub source_vcfs: Vec<String>,

    /// Cloud project that owns the Genomics dataset
    #[arg(long)]
    pub project: String,

    /// Genomics dataset name or id
    #[arg(long)]
    pub dataset: String,

    /// Variant set name or id
    #[arg(long)]
    pub variantset: String,

    /// Destination table as PROJECT.DATASET.TABLE (overwritten)
    #[arg(long)]
    pub destination_table: TableRef,

    /// Always create a new dataset, even if one with this name exists
    #[arg(long)]
    pub new_dataset: bool,

    /// Always create a new variant set, even if one with this name exists
    #[arg(long)]
    pub new_variantset: bool,

    /// Expand `*` wildcards before importing and import each match separately
    #[arg(long)]
    pub expand_wildcards: bool,

    /// Description for the destination table
    #[arg(long)]
    pub description: Option<String>,

    /// Seconds between operation status queries
    #[arg(long, env = "CURATION_POLL_INTERVAL_SECS")]
    pub poll_interval_secs: Option<u64>,
}

/// Arguments for `curation update-schema`
#[derive(Args, Debug, Clone)]
pub struct UpdateSchemaArgs {
    /// VCF whose header supplies the descriptions (local or gs://, `*` picks the first match)
    #[arg(long)]
    pub source_vcf: String,

    /// Table to update as PROJECT.DATASET.TABLE
    #[arg(long)]
    pub destination_table: TableRef,

    /// Description for the table itself
    #[arg(long)]
    pub description: Option<String>,
}

impl UploadArgs {
    pub fn to_request(&self) -> upload::UploadRequest {
        upload::UploadRequest {
            source_vcfs: self.source_vcfs.clone(),
            project_id: self.project.clone(),
            dataset: self.dataset.clone(),
            variant_set: self.variantset.clone(),
            destination_table: self.destination_table.clone(),
            new_dataset: self.new_dataset,
            new_variant_set: self.new_variantset,
            expand_wildcards: self.expand_wildcards,
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from([
            "curation",
            "upload",
            "--source-vcf",
            "gs://bucket/chr1.vcf",
            "gs://bucket/chr2.vcf",
            "--project",
            "proj",
            "--dataset",
            "platinum",
            "--variantset",
            "calls",
            "--destination-table",
            "domain.com:proj.genomics.variants",
            "--new-variantset",
        ])
        .unwrap();

        let Some(Commands::Upload(args)) = cli.command else {
            panic!("expected upload");
        };
        let request = args.to_request();
        assert_eq!(request.source_vcfs.len(), 2);
        assert!(request.new_variant_set);
        assert!(!request.new_dataset);
        assert_eq!(request.destination_table.project_id, "domain.com:proj");
    }

    #[test]
    fn test_bad_table_name_is_rejected() {
        let result = Cli::try_parse_from([
            "curation",
            "update-schema",
            "--source-vcf",
            "a.vcf",
            "--destination-table",
            "just.two",
        ]);
        assert!(result.is_err());
    }
}
