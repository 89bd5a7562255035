//! Rendering of the annotated all-possible-SNPs queries
//!
//! Two Jinja templates are rendered with the same context: a JOIN query that
//! builds the annotated table and a small query to sanity-check its result.
//! The context holds one table name per annotation source for the selected
//! reference build, the sequence table and the list of source names.

use crate::error::{Result, SnpsError};
use curation_common::types::TableRef;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Annotation sources joined onto the SNPs, in output column order
pub const ANNOTATION_SOURCES: &[&str] = &["dbSNP", "clinvar", "thousandGenomes", "ESP_AA", "ESP_EA"];

/// Default location of the rendered JOIN query
pub const DEFAULT_OUTPUT: &str = "annotated_snps_RENDERED.sql";

const JOIN_TEMPLATE: &str = include_str!("../sql/join_annotations.sql");
const CHECK_TEMPLATE: &str = include_str!("../sql/check_joined_annotations.sql");

const ANNOTATION_DATASET: &str = "bigquery-public-data.human_variant_annotation";

/// Human reference genome build the annotation tables are aligned to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenomeBuild {
    #[default]
    B37,
    B38,
}

impl fmt::Display for GenomeBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::B37 => f.write_str("b37"),
            Self::B38 => f.write_str("b38"),
        }
    }
}

impl GenomeBuild {
    /// BRCA1 on chromosome 17, used to keep debug output small
    fn debug_region(self) -> (u64, u64) {
        match self {
            Self::B37 => (41_196_311, 41_277_499),
            Self::B38 => (43_045_628, 43_125_483),
        }
    }

    fn assembly(self) -> &'static str {
        match self {
            Self::B37 => "hg19",
            Self::B38 => "hg38",
        }
    }

    /// Template context for this build.
    ///
    /// Without `debug` the sequence filter is empty and the whole genome is
    /// annotated.
    pub fn replacements(self, sequence_table: &TableRef, debug: bool) -> QueryReplacements {
        let assembly = self.assembly();
        let table = |name: String| format!("{}.{}", ANNOTATION_DATASET, name);

        let sequence_filter = if debug {
            let (start, end) = self.debug_region();
            format!(
                "WHERE chr IN ('chr17', '17')\n    AND sequence_start BETWEEN {} AND {}",
                start, end
            )
        } else {
            String::new()
        };

        QueryReplacements {
            sequence_filter,
            sequence_table: sequence_table.to_string(),
            dbsnp_table: table(format!("ncbi_dbsnp_{}_20170710", assembly)),
            clinvar_table: table(format!("ncbi_clinvar_{}_20170705", assembly)),
            thousand_genomes_table: table(format!("ensembl_1000genomes_phase3_{}_release89", assembly)),
            esp_aa_table: table(format!("ensembl_esp6500_aa_{}_release89", assembly)),
            esp_ea_table: table(format!("ensembl_esp6500_ea_{}_release89", assembly)),
            annot_sources: ANNOTATION_SOURCES.to_vec(),
        }
    }
}

/// Variables available to the templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct QueryReplacements {
    pub sequence_filter: String,
    pub sequence_table: String,
    pub dbsnp_table: String,
    pub clinvar_table: String,
    pub thousand_genomes_table: String,
    pub esp_aa_table: String,
    pub esp_ea_table: String,
    #[serde(rename = "annot_sources")]
    pub annot_sources: Vec<&'static str>,
}

/// Template sources for the two queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub join: String,
    pub check: String,
}

impl Templates {
    /// Templates bundled with the crate
    pub fn builtin() -> Self {
        Self {
            join: JOIN_TEMPLATE.to_string(),
            check: CHECK_TEMPLATE.to_string(),
        }
    }

    /// Read templates from disk, falling back to the bundled ones
    pub fn load(join: Option<&Path>, check: Option<&Path>) -> Result<Self> {
        let builtin = Self::builtin();
        Ok(Self {
            join: join.map(read_template).transpose()?.unwrap_or(builtin.join),
            check: check.map(read_template).transpose()?.unwrap_or(builtin.check),
        })
    }
}

fn read_template(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "Reading template");
    std::fs::read_to_string(path).map_err(|source| SnpsError::ReadTemplate {
        path: path.to_path_buf(),
        source,
    })
}

/// Both rendered queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQueries {
    pub join: String,
    pub check: String,
}

/// Render one template. Unknown variables are errors.
pub fn render(name: &str, source: &str, replacements: &QueryReplacements) -> Result<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env.add_template(name, source)?;

    Ok(env.get_template(name)?.render(replacements)?)
}

pub fn render_queries(templates: &Templates, replacements: &QueryReplacements) -> Result<RenderedQueries> {
    Ok(RenderedQueries {
        join: render("join_annotations.sql", &templates.join, replacements)?,
        check: render("check_joined_annotations.sql", &templates.check, replacements)?,
    })
}

/// Render both queries and write the JOIN query to `output`. Returns the
/// check query.
pub fn write_join_query(
    templates: &Templates,
    replacements: &QueryReplacements,
    output: &Path,
) -> Result<String> {
    let queries = render_queries(templates, replacements)?;

    std::fs::write(output, &queries.join).map_err(|source| SnpsError::WriteOutput {
        path: PathBuf::from(output),
        source,
    })?;
    info!(output = %output.display(), bytes = queries.join.len(), "Wrote JOIN query");

    Ok(queries.check)
}

/// Instructions printed after rendering
pub fn usage_message(output: &Path, check_query: &str) -> String {
    format!(
        "\nResulting JOIN query written to output file {}.  Run that query using the\n\
         BigQuery web UI or the bq command line tool.\n\n\
         Be sure to test the result of the JOIN, for example:\n\n{}\n",
        output.display(),
        check_query
    )
}
