//! Common types used across the curation tools

use crate::error::{CurationError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Warehouse Types
// ============================================================================

/// A fully qualified BigQuery table name.
///
/// The textual form is `PROJECT_ID.DATASET_NAME.TABLE_NAME`. Domain-scoped
/// projects (`example.com:my-project`) may themselves contain periods, so the
/// dataset and table are always taken from the last two components and
/// everything before them is the project.
///
/// # Examples
///
/// ```
/// use curation_common::types::TableRef;
///
/// let table = TableRef::parse("proj.with.dots.dataset.table").unwrap();
/// assert_eq!(table.project_id, "proj.with.dots");
/// assert_eq!(table.dataset_id, "dataset");
/// assert_eq!(table.table_id, "table");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    /// Project that owns the dataset
    pub project_id: String,

    /// Dataset containing the table
    pub dataset_id: String,

    /// Table name
    pub table_id: String,
}

impl TableRef {
    const DELIMITER: char = '.';

    pub fn new(
        project_id: impl Into<String>,
        dataset_id: impl Into<String>,
        table_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
            table_id: table_id.into(),
        }
    }

    /// Tokenize `PROJECT_ID.DATASET_NAME.TABLE_NAME`.
    pub fn parse(full_name: &str) -> Result<Self> {
        let mut parts = full_name.rsplitn(3, Self::DELIMITER);

        let (Some(table), Some(dataset), Some(project)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CurationError::InvalidTableName(full_name.to_string()));
        };

        if project.is_empty() || dataset.is_empty() || table.is_empty() {
            return Err(CurationError::InvalidTableName(full_name.to_string()));
        }

        Ok(Self::new(project, dataset, table))
    }
}

impl std::str::FromStr for TableRef {
    type Err = CurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}
