//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod update_schema;
pub mod upload;

use crate::api::auth::resolve_access_token;
use crate::api::{ApiClient, BigQueryClient, GenomicsClient};
use crate::config::Config;
use crate::error::Result;
use crate::storage::CloudStorage;

/// Authenticated clients for every remote service
pub(crate) struct Services {
    pub genomics: GenomicsClient,
    pub warehouse: BigQueryClient,
    pub storage: CloudStorage,
}

impl Services {
    pub(crate) async fn connect(config: &Config) -> Result<Self> {
        let token = resolve_access_token(config).await?;
        let http = ApiClient::new(config, &token)?;

        Ok(Self {
            genomics: GenomicsClient::new(http.clone(), &config.genomics_url),
            warehouse: BigQueryClient::new(http.clone(), &config.bigquery_url),
            storage: CloudStorage::new(http, &config.storage_url),
        })
    }
}
