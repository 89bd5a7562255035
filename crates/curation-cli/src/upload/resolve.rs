//! Name-or-id resolution for datasets and variant sets

use crate::api::types::{Dataset, VariantSet};
use crate::api::GenomicsApi;
use crate::error::{CliError, Result};
use tracing::info;

/// A remote record addressable by id or by display name
pub trait NamedResource {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl NamedResource for Dataset {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl NamedResource for VariantSet {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Find the id of the unique candidate whose id or name equals `target`.
///
/// Returns `Ok(None)` when nothing matches. A candidate matching on both
/// fields counts once; two different candidates matching is an error.
pub fn find_id_or_name<'a, T, I>(kind: &'static str, target: &str, candidates: I) -> Result<Option<String>>
where
    T: NamedResource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut found: Option<&str> = None;

    for candidate in candidates {
        if candidate.id() == target || candidate.name() == target {
            if found.is_some() {
                return Err(CliError::ambiguous(kind, target));
            }
            found = Some(candidate.id());
        }
    }

    Ok(found.map(str::to_string))
}

/// Resolve a dataset by name or id, creating it when absent or when forced.
///
/// The lookup runs even when forced, so an ambiguous name is rejected
/// before anything is created.
pub async fn find_or_create_dataset(
    api: &dyn GenomicsApi,
    project_id: &str,
    dataset: &str,
    always_create: bool,
) -> Result<String> {
    let existing = api.list_datasets(project_id).await?;
    let found = find_id_or_name("dataset", dataset, &existing)?;
    if let (Some(id), false) = (found, always_create) {
        info!(dataset, dataset_id = %id, "Using existing dataset");
        return Ok(id);
    }

    let created = api.create_dataset(project_id, dataset).await?;
    info!(dataset, dataset_id = %created.id, "Created dataset");
    Ok(created.id)
}

/// Resolve a variant set by name or id within a dataset, creating it when
/// absent or when forced
pub async fn find_or_create_variant_set(
    api: &dyn GenomicsApi,
    dataset_id: &str,
    variant_set: &str,
    description: &str,
    always_create: bool,
) -> Result<String> {
    let existing = api.search_variant_sets(dataset_id).await?;
    let found = find_id_or_name("variantset", variant_set, &existing)?;
    if let (Some(id), false) = (found, always_create) {
        info!(variant_set, variant_set_id = %id, "Using existing variant set");
        return Ok(id);
    }

    let created = api
        .create_variant_set(dataset_id, variant_set, description)
        .await?;
    info!(variant_set, variant_set_id = %created.id, "Created variant set");
    Ok(created.id)
}
