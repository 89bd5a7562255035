//! API request and response types
//!
//! Mirror the JSON shapes of the Genomics v1, BigQuery v2 and Cloud Storage
//! JSON APIs. Only the fields the tools read are modelled; BigQuery schema
//! fields keep everything else in `extra` so a schema patch round-trips.

use curation_common::types::TableRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Genomics
// ============================================================================

/// A Genomics dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub project_id: String,
}

/// A Genomics variant set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSet {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dataset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDatasetsResponse {
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatasetRequest<'a> {
    pub name: &'a str,
    pub project_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariantSetsRequest<'a> {
    pub dataset_ids: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariantSetsResponse {
    #[serde(default)]
    pub variant_sets: Vec<VariantSet>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariantSetRequest<'a> {
    pub name: &'a str,
    pub dataset_id: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportVariantsRequest<'a> {
    pub variant_set_id: &'a str,
    pub source_uris: Vec<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportVariantSetRequest<'a> {
    pub project_id: &'a str,
    pub bigquery_dataset: &'a str,
    pub bigquery_table: &'a str,
}

impl<'a> ExportVariantSetRequest<'a> {
    pub fn for_table(table: &'a TableRef) -> Self {
        Self {
            project_id: &table.project_id,
            bigquery_dataset: &table.dataset_id,
            bigquery_table: &table.table_id,
        }
    }
}

/// Opaque name of a long-running operation, e.g. `operations/CJHu...`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationHandle(pub String);

impl OperationHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observable state of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Pending,
    Succeeded,
    Failed,
}

/// A long-running operation as returned by `operations.get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl Operation {
    pub fn handle(&self) -> OperationHandle {
        OperationHandle::new(self.name.clone())
    }

    /// Success means done, a result payload and no error payload.
    /// Every other completed combination is a failure.
    pub fn status(&self) -> OperationStatus {
        if !self.done {
            OperationStatus::Pending
        } else if self.response.is_some() && self.error.is_none() {
            OperationStatus::Succeeded
        } else {
            OperationStatus::Failed
        }
    }

    /// Human readable error message, when the operation carries one
    pub fn error_message(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        Some(
            error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
        )
    }
}

// ============================================================================
// BigQuery
// ============================================================================

/// A BigQuery table resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_reference: Option<TableRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: TableSchema,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

/// One column; `RECORD` columns nest further fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableFieldSchema {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<TableFieldSchema>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TableFieldSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_fields(mut self, fields: Vec<TableFieldSchema>) -> Self {
        self.field_type = Some("RECORD".to_string());
        self.fields = fields;
        self
    }
}

/// Body of a `tables.patch` request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TablePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,
}

// ============================================================================
// Cloud Storage
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectList {
    #[serde(default)]
    pub items: Vec<StorageObject>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageObject {
    pub name: String,
    pub bucket: String,
}

// ============================================================================
// Errors
// ============================================================================

/// Standard Google API error envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorStatus {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}
