//! Google Genomics v1 client
//!
//! [`GenomicsApi`] is the narrow capability surface the upload workflow
//! needs; [`GenomicsClient`] implements it over REST.

use crate::api::client::ApiClient;
use crate::api::endpoints;
use crate::api::types::*;
use crate::error::Result;
use async_trait::async_trait;
use curation_common::types::TableRef;

/// Genomics operations used by the upload workflow
#[async_trait]
pub trait GenomicsApi: Send + Sync {
    /// List every dataset in a project (all pages)
    async fn list_datasets(&self, project_id: &str) -> Result<Vec<Dataset>>;

    async fn create_dataset(&self, project_id: &str, name: &str) -> Result<Dataset>;

    /// List every variant set in a dataset (all pages)
    async fn search_variant_sets(&self, dataset_id: &str) -> Result<Vec<VariantSet>>;

    async fn create_variant_set(
        &self,
        dataset_id: &str,
        name: &str,
        description: &str,
    ) -> Result<VariantSet>;

    /// Start importing VCF data into a variant set
    async fn import_variants(
        &self,
        variant_set_id: &str,
        source_uris: &[String],
    ) -> Result<OperationHandle>;

    async fn get_operation(&self, handle: &OperationHandle) -> Result<Operation>;

    /// Start exporting a variant set to a BigQuery table (overwrites it)
    async fn export_variant_set(
        &self,
        variant_set_id: &str,
        destination: &TableRef,
    ) -> Result<OperationHandle>;
}

/// REST implementation of [`GenomicsApi`]
pub struct GenomicsClient {
    http: ApiClient,
    base_url: String,
}

impl GenomicsClient {
    pub fn new(http: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl GenomicsApi for GenomicsClient {
    async fn list_datasets(&self, project_id: &str) -> Result<Vec<Dataset>> {
        let mut datasets = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = endpoints::datasets_url(&self.base_url, project_id, page_token.as_deref());
            let page: ListDatasetsResponse = self.http.get_json(&url).await?;
            datasets.extend(page.datasets);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(datasets)
    }

    async fn create_dataset(&self, project_id: &str, name: &str) -> Result<Dataset> {
        let url = endpoints::create_dataset_url(&self.base_url);
        self.http
            .post_json(&url, &CreateDatasetRequest { name, project_id })
            .await
    }

    async fn search_variant_sets(&self, dataset_id: &str) -> Result<Vec<VariantSet>> {
        let url = endpoints::search_variant_sets_url(&self.base_url);
        let mut variant_sets = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let request = SearchVariantSetsRequest {
                dataset_ids: vec![dataset_id],
                page_token: page_token.take(),
            };
            let page: SearchVariantSetsResponse = self.http.post_json(&url, &request).await?;
            variant_sets.extend(page.variant_sets);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(variant_sets)
    }

    async fn create_variant_set(
        &self,
        dataset_id: &str,
        name: &str,
        description: &str,
    ) -> Result<VariantSet> {
        let url = endpoints::create_variant_set_url(&self.base_url);
        self.http
            .post_json(
                &url,
                &CreateVariantSetRequest {
                    name,
                    dataset_id,
                    description,
                },
            )
            .await
    }

    async fn import_variants(
        &self,
        variant_set_id: &str,
        source_uris: &[String],
    ) -> Result<OperationHandle> {
        let url = endpoints::import_variants_url(&self.base_url);
        let request = ImportVariantsRequest {
            variant_set_id,
            source_uris: source_uris.iter().map(String::as_str).collect(),
        };
        let operation: Operation = self.http.post_json(&url, &request).await?;
        Ok(operation.handle())
    }

    async fn get_operation(&self, handle: &OperationHandle) -> Result<Operation> {
        let url = endpoints::operation_url(&self.base_url, handle.as_str());
        self.http.get_json(&url).await
    }

    async fn export_variant_set(
        &self,
        variant_set_id: &str,
        destination: &TableRef,
    ) -> Result<OperationHandle> {
        let url = endpoints::export_variant_set_url(&self.base_url, variant_set_id);
        let operation: Operation = self
            .http
            .post_json(&url, &ExportVariantSetRequest::for_table(destination))
            .await?;
        Ok(operation.handle())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GenomicsClient {
        let http = ApiClient::new(&Config::default(), "token").unwrap();
        GenomicsClient::new(http, server.uri())
    }

    #[tokio::test]
    async fn test_list_datasets_follows_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/datasets"))
            .and(query_param("projectId", "proj"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "datasets": [{"id": "2", "name": "second", "projectId": "proj"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/datasets"))
            .and(query_param("projectId", "proj"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "datasets": [{"id": "1", "name": "first", "projectId": "proj"}],
                "nextPageToken": "p2"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let datasets = client(&server).list_datasets("proj").await.unwrap();
        let ids: Vec<_> = datasets.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_list_datasets_empty_project() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/datasets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        assert!(client(&server).list_datasets("proj").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_variants_returns_operation_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/variants:import"))
            .and(body_json(json!({
                "variantSetId": "vs1",
                "sourceUris": ["gs://bucket/chr1.vcf"]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "operations/import-1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let handle = client(&server)
            .import_variants("vs1", &["gs://bucket/chr1.vcf".to_string()])
            .await
            .unwrap();
        assert_eq!(handle, OperationHandle::new("operations/import-1"));
    }

    #[tokio::test]
    async fn test_export_variant_set_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/variantsets/vs1:export"))
            .and(body_json(json!({
                "projectId": "proj.with.dots",
                "bigqueryDataset": "dataset",
                "bigqueryTable": "table"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "operations/export-1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let table = TableRef::parse("proj.with.dots.dataset.table").unwrap();
        let handle = client(&server).export_variant_set("vs1", &table).await.unwrap();
        assert_eq!(handle.as_str(), "operations/export-1");
    }

    #[tokio::test]
    async fn test_get_operation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/operations/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "operations/abc",
                "done": true,
                "response": {"@type": "type.googleapis.com/google.genomics.v1.ImportVariantsResponse"}
            })))
            .mount(&server)
            .await;

        let op = client(&server)
            .get_operation(&OperationHandle::new("operations/abc"))
            .await
            .unwrap();
        assert_eq!(op.status(), OperationStatus::Succeeded);
    }
}
