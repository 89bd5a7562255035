//! Variants table schema descriptions
//!
//! Reads the `##FILTER`, `##FORMAT` and `##INFO` declarations from a VCF
//! header and copies them onto the matching BigQuery columns.

pub mod header;
pub mod update;

pub use header::{FieldHeader, FilterHeader, HeaderDescriptions};
pub use update::{
    describe_fields, filter_description, load_descriptions, load_descriptions_within,
    truncate_description, update_table_schema, MAX_DESCRIPTION_LENGTH,
};
