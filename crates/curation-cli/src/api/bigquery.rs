//! BigQuery v2 client

use crate::api::client::ApiClient;
use crate::api::endpoints;
use crate::api::types::{Table, TablePatch};
use crate::error::Result;
use async_trait::async_trait;
use curation_common::types::TableRef;

/// Warehouse operations used by the schema updater
#[async_trait]
pub trait WarehouseApi: Send + Sync {
    async fn get_table(&self, table: &TableRef) -> Result<Table>;

    /// Patch description and/or schema in place
    async fn patch_table(&self, table: &TableRef, patch: &TablePatch) -> Result<Table>;
}

/// REST implementation of [`WarehouseApi`]
pub struct BigQueryClient {
    http: ApiClient,
    base_url: String,
}

impl BigQueryClient {
    pub fn new(http: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl WarehouseApi for BigQueryClient {
    async fn get_table(&self, table: &TableRef) -> Result<Table> {
        self.http
            .get_json(&endpoints::table_url(&self.base_url, table))
            .await
    }

    async fn patch_table(&self, table: &TableRef, patch: &TablePatch) -> Result<Table> {
        self.http
            .patch_json(&endpoints::table_url(&self.base_url, table), patch)
            .await
    }
}
