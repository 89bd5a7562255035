//! API endpoint URL builders
//!
//! Helper functions to construct Genomics, BigQuery and Cloud Storage URLs.

use curation_common::types::TableRef;
use urlencoding::encode;

// ============================================================================
// Genomics
// ============================================================================

/// Build dataset list URL
pub fn datasets_url(base_url: &str, project_id: &str, page_token: Option<&str>) -> String {
    let mut url = format!("{}/datasets?projectId={}", base_url, encode(project_id));

    if let Some(token) = page_token {
        url.push_str(&format!("&pageToken={}", encode(token)));
    }

    url
}

/// Build dataset create URL
pub fn create_dataset_url(base_url: &str) -> String {
    format!("{}/datasets", base_url)
}

/// Build variant set search URL
pub fn search_variant_sets_url(base_url: &str) -> String {
    format!("{}/variantsets/search", base_url)
}

/// Build variant set create URL
pub fn create_variant_set_url(base_url: &str) -> String {
    format!("{}/variantsets", base_url)
}

/// Build variant import URL
pub fn import_variants_url(base_url: &str) -> String {
    format!("{}/variants:import", base_url)
}

/// Build variant set export URL
pub fn export_variant_set_url(base_url: &str, variant_set_id: &str) -> String {
    format!("{}/variantsets/{}:export", base_url, encode(variant_set_id))
}

/// Build operation URL; operation names already carry their `operations/` prefix
pub fn operation_url(base_url: &str, operation_name: &str) -> String {
    let path = operation_name
        .split('/')
        .map(|segment| encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", base_url, path)
}

// ============================================================================
// BigQuery
// ============================================================================

/// Build table URL (GET and PATCH)
pub fn table_url(base_url: &str, table: &TableRef) -> String {
    format!(
        "{}/projects/{}/datasets/{}/tables/{}",
        base_url,
        encode(&table.project_id),
        encode(&table.dataset_id),
        encode(&table.table_id)
    )
}

// ============================================================================
// Cloud Storage
// ============================================================================

/// Build object listing URL
pub fn list_objects_url(
    base_url: &str,
    bucket: &str,
    prefix: &str,
    page_token: Option<&str>,
) -> String {
    let mut url = format!("{}/b/{}/o?prefix={}", base_url, encode(bucket), encode(prefix));

    if let Some(token) = page_token {
        url.push_str(&format!("&pageToken={}", encode(token)));
    }

    url
}

/// Build object media download URL
pub fn object_media_url(base_url: &str, bucket: &str, object: &str) -> String {
    format!("{}/b/{}/o/{}?alt=media", base_url, encode(bucket), encode(object))
}
