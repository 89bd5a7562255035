//! Column descriptions for an exported variants table

use crate::api::types::{TableFieldSchema, TablePatch, TableSchema};
use crate::api::WarehouseApi;
use crate::error::{CliError, Result};
use crate::schema::header::{FilterHeader, HeaderDescriptions};
use crate::storage::{has_wildcard, SourceStore, HEADER_FETCH_BYTES};
use curation_common::types::TableRef;
use tracing::{debug, info, warn};

/// BigQuery rejects longer descriptions
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

const CALL_FIELD: &str = "call";
const FILTER_FIELD: &str = "filter";

/// Columns every Genomics export has, keyed by lower-case name
const VARIANT_FIELD_DESCRIPTIONS: &[(&str, &str)] = &[
    (
        "reference_name",
        "An identifier from the reference genome or an angle-bracketed ID string pointing to a contig in the assembly file.",
    ),
    ("start", "The reference position, with the first base having position 0."),
    ("end", "End position of the variant described in this record."),
    (
        "reference_bases",
        "Each base must be one of A,C,G,T,N (case insensitive). Multiple bases are permitted. The value in the 'start' field refers to the position of the first base in the string.",
    ),
    ("alternate_bases", "List of alternate non-reference alleles."),
    ("variant_id", "Google Genomics variant id."),
    ("quality", "Phred-scaled quality score for the assertion made in ALT."),
    ("names", "List of unique identifiers for the variant where available."),
    ("call", "Per-sample measurements."),
];

/// Fixed columns of the nested `call` record
const CALL_FIELD_DESCRIPTIONS: &[(&str, &str)] = &[
    (
        "call_set_id",
        "The id of the callset from which this data was exported from the Google Genomics Variants API.",
    ),
    ("call_set_name", "Sample identifier from source data."),
    ("genotype", "List of genotypes."),
    ("genotype_likelihood", "List of genotype likelihoods."),
    (
        "phaseset",
        "If this value is null, the data is unphased.  Otherwise it is phased.",
    ),
    ("qual", "Phred-scaled quality score for the assertion made in ALT."),
];

fn fixed_description(table: &'static [(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    table.iter().find(|(key, _)| *key == lower).map(|(_, desc)| *desc)
}

/// Cut a description to [`MAX_DESCRIPTION_LENGTH`] characters, warning when
/// anything is dropped
pub fn truncate_description(subject: &str, description: &str) -> String {
    match description.char_indices().nth(MAX_DESCRIPTION_LENGTH) {
        Some((cut, _)) => {
            warn!(subject, "Truncating description to comply with BigQuery length limits");
            description[..cut].to_string()
        }
        None => description.to_string(),
    }
}

/// `ID: description` per filter; only the IDs when that would be too long
pub fn filter_description(filters: &[FilterHeader]) -> String {
    let full = filters
        .iter()
        .map(|f| format!("{}: {}", f.id, f.description))
        .collect::<Vec<_>>()
        .join("\n");

    if full.chars().count() <= MAX_DESCRIPTION_LENGTH {
        return full;
    }

    warn!("Filter descriptions too long, describing the filter column with IDs only");
    filters
        .iter()
        .map(|f| f.id.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fill in descriptions on a variants schema. Returns how many columns were
/// given a description.
///
/// Columns with no matching description keep whatever they had.
pub fn describe_fields(fields: &mut [TableFieldSchema], header: &HeaderDescriptions) -> usize {
    let filter = filter_description(&header.filters);
    let mut described = 0;

    for field in fields.iter_mut() {
        let description = fixed_description(VARIANT_FIELD_DESCRIPTIONS, &field.name)
            .or_else(|| header.info_description(&field.name))
            .or_else(|| field.name.eq_ignore_ascii_case(FILTER_FIELD).then_some(filter.as_str()));

        if let Some(description) = description {
            debug!(field = %field.name, description, "Variant field");
            field.description = Some(description.to_string());
            described += 1;
        }
        cap_description(field);

        if field.name == CALL_FIELD {
            described += describe_call_fields(&mut field.fields, header, &filter);
        }
    }

    described
}

fn describe_call_fields(fields: &mut [TableFieldSchema], header: &HeaderDescriptions, filter: &str) -> usize {
    let mut described = 0;

    for field in fields.iter_mut() {
        let description = fixed_description(CALL_FIELD_DESCRIPTIONS, &field.name)
            .or_else(|| header.format_description(&field.name))
            .or_else(|| header.info_description(&field.name))
            .or_else(|| field.name.eq_ignore_ascii_case(FILTER_FIELD).then_some(filter));

        if let Some(description) = description {
            debug!(field = %field.name, description, "Call field");
            field.description = Some(description.to_string());
            described += 1;
        }
        cap_description(field);
    }

    described
}

fn cap_description(field: &mut TableFieldSchema) {
    if let Some(description) = field.description.as_deref() {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            field.description = Some(truncate_description(&field.name, description));
        }
    }
}

/// Read and parse the header of a VCF. A path with wildcards reads the first
/// match.
pub async fn load_descriptions(store: &dyn SourceStore, source: &str) -> Result<HeaderDescriptions> {
    load_descriptions_within(store, source, HEADER_FETCH_BYTES).await
}

/// Like [`load_descriptions`], reading at most `max_bytes` of the source.
///
/// Fails with [`CliError::TruncatedHeader`] only when the read was cut at
/// `max_bytes` before `#CHROM`; a shorter source without `#CHROM` is
/// accepted as-is.
pub async fn load_descriptions_within(
    store: &dyn SourceStore,
    source: &str,
    max_bytes: u64,
) -> Result<HeaderDescriptions> {
    let path = if has_wildcard(source) {
        store
            .expand(source)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CliError::SourceNotFound(source.to_string()))?
    } else {
        source.to_string()
    };

    info!(source = %path, "Reading VCF header");
    let bytes = store.read_head(&path, max_bytes).await?;
    let header = HeaderDescriptions::from_bytes(&bytes)?;

    if !header.complete && bytes.len() as u64 >= max_bytes {
        return Err(CliError::TruncatedHeader(path));
    }

    debug!(
        filters = header.filters.len(),
        formats = header.formats.len(),
        infos = header.infos.len(),
        "Parsed VCF header"
    );
    Ok(header)
}

/// Describe the columns of `table` from the header of `source` and patch the
/// table once with the new schema and optional table description.
///
/// Returns the number of columns described.
pub async fn update_table_schema(
    warehouse: &dyn WarehouseApi,
    store: &dyn SourceStore,
    table: &TableRef,
    source: &str,
    description: Option<&str>,
) -> Result<usize> {
    let header = load_descriptions(store, source).await?;

    let current = warehouse.get_table(table).await?;
    let mut fields = current.schema.fields;
    if !fields.iter().any(|f| f.name == CALL_FIELD) {
        return Err(CliError::MissingCallField(table.to_string()));
    }
    let described = describe_fields(&mut fields, &header);

    let patch = TablePatch {
        description: description.map(|d| truncate_description("table description", d)),
        schema: Some(TableSchema { fields }),
    };

    info!(table = %table, described, "Updating table schema");
    warehouse.patch_table(table, &patch).await?;

    Ok(described)
}
