//! In-memory fakes for the remote capability traits

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::api::types::*;
use crate::api::{GenomicsApi, WarehouseApi};
use crate::error::{CliError, Result};
use crate::storage::{wildcard_regex, SourceStore};
use crate::upload::poll::Clock;
use async_trait::async_trait;
use curation_common::types::TableRef;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Operation that has not finished yet
pub fn pending() -> Operation {
    Operation {
        name: String::new(),
        done: false,
        response: None,
        error: None,
    }
}

pub fn succeeded() -> Operation {
    Operation {
        name: String::new(),
        done: true,
        response: Some(json!({})),
        error: None,
    }
}

pub fn failed(message: &str) -> Operation {
    Operation {
        name: String::new(),
        done: true,
        response: None,
        error: Some(json!({"code": 3, "message": message})),
    }
}

/// One scripted answer to `get_operation`
#[derive(Debug, Clone)]
pub enum Step {
    Report(Operation),
    /// The status query itself fails with a 503
    Unavailable,
}

/// Every call made against [`FakeGenomics`], in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListDatasets { project_id: String },
    CreateDataset { project_id: String, name: String },
    SearchVariantSets { dataset_id: String },
    CreateVariantSet { dataset_id: String, name: String, description: String },
    ImportVariants { variant_set_id: String, source_uris: Vec<String> },
    GetOperation(String),
    ExportVariantSet { variant_set_id: String, destination: TableRef },
}

/// Scripted Genomics service.
///
/// Imports are named `operations/import-N` (1-based, in submission order)
/// and the export `operations/export-1`. Operations without a script, or
/// whose script has run out, report success.
#[derive(Default)]
pub struct FakeGenomics {
    datasets: Mutex<Vec<Dataset>>,
    variant_sets: Mutex<Vec<VariantSet>>,
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGenomics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(self, id: &str, name: &str) -> Self {
        self.datasets.lock().unwrap().push(Dataset {
            id: id.to_string(),
            name: name.to_string(),
            project_id: "proj".to_string(),
        });
        self
    }

    pub fn with_variant_set(self, id: &str, dataset_id: &str, name: &str) -> Self {
        self.variant_sets.lock().unwrap().push(VariantSet {
            id: id.to_string(),
            name: name.to_string(),
            dataset_id: dataset_id.to_string(),
            description: None,
        });
        self
    }

    pub fn with_script(self, operation: &str, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(operation.to_string(), steps.into());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn operation_queries(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::GetOperation(name) if name == operation))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }
}

#[async_trait]
impl GenomicsApi for FakeGenomics {
    async fn list_datasets(&self, project_id: &str) -> Result<Vec<Dataset>> {
        self.record(Call::ListDatasets {
            project_id: project_id.to_string(),
        });
        Ok(self.datasets.lock().unwrap().clone())
    }

    async fn create_dataset(&self, project_id: &str, name: &str) -> Result<Dataset> {
        self.record(Call::CreateDataset {
            project_id: project_id.to_string(),
            name: name.to_string(),
        });
        let n = self.count(|c| matches!(c, Call::CreateDataset { .. }));
        let dataset = Dataset {
            id: format!("dataset-{n}"),
            name: name.to_string(),
            project_id: project_id.to_string(),
        };
        self.datasets.lock().unwrap().push(dataset.clone());
        Ok(dataset)
    }

    async fn search_variant_sets(&self, dataset_id: &str) -> Result<Vec<VariantSet>> {
        self.record(Call::SearchVariantSets {
            dataset_id: dataset_id.to_string(),
        });
        Ok(self
            .variant_sets
            .lock()
            .unwrap()
            .iter()
            .filter(|vs| vs.dataset_id == dataset_id)
            .cloned()
            .collect())
    }

    async fn create_variant_set(
        &self,
        dataset_id: &str,
        name: &str,
        description: &str,
    ) -> Result<VariantSet> {
        self.record(Call::CreateVariantSet {
            dataset_id: dataset_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        });
        let n = self.count(|c| matches!(c, Call::CreateVariantSet { .. }));
        let variant_set = VariantSet {
            id: format!("variantset-{n}"),
            name: name.to_string(),
            dataset_id: dataset_id.to_string(),
            description: Some(description.to_string()),
        };
        self.variant_sets.lock().unwrap().push(variant_set.clone());
        Ok(variant_set)
    }

    async fn import_variants(
        &self,
        variant_set_id: &str,
        source_uris: &[String],
    ) -> Result<OperationHandle> {
        self.record(Call::ImportVariants {
            variant_set_id: variant_set_id.to_string(),
            source_uris: source_uris.to_vec(),
        });
        let n = self.count(|c| matches!(c, Call::ImportVariants { .. }));
        Ok(OperationHandle::new(format!("operations/import-{n}")))
    }

    async fn get_operation(&self, handle: &OperationHandle) -> Result<Operation> {
        self.record(Call::GetOperation(handle.to_string()));

        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(handle.as_str())
            .and_then(VecDeque::pop_front)
            .unwrap_or(Step::Report(succeeded()));

        match step {
            Step::Report(mut operation) => {
                operation.name = handle.to_string();
                Ok(operation)
            }
            Step::Unavailable => Err(CliError::api(503, "Service unavailable")),
        }
    }

    async fn export_variant_set(
        &self,
        variant_set_id: &str,
        destination: &TableRef,
    ) -> Result<OperationHandle> {
        self.record(Call::ExportVariantSet {
            variant_set_id: variant_set_id.to_string(),
            destination: destination.clone(),
        });
        let n = self.count(|c| matches!(c, Call::ExportVariantSet { .. }));
        Ok(OperationHandle::new(format!("operations/export-{n}")))
    }
}

/// Warehouse holding a single table, recording every patch
pub struct FakeWarehouse {
    table: Mutex<Table>,
    patches: Mutex<Vec<(TableRef, TablePatch)>>,
}

impl FakeWarehouse {
    pub fn new(fields: Vec<TableFieldSchema>) -> Self {
        Self {
            table: Mutex::new(Table {
                table_reference: None,
                description: None,
                schema: TableSchema { fields },
            }),
            patches: Mutex::new(Vec::new()),
        }
    }

    /// The columns a Genomics export produces, trimmed to a few
    pub fn variants_fields() -> Vec<TableFieldSchema> {
        let call = TableFieldSchema::new("call").with_fields(vec![
            TableFieldSchema::new("call_set_name"),
            TableFieldSchema::new("genotype"),
            TableFieldSchema::new("DP"),
            TableFieldSchema::new("FILTER"),
        ]);
        vec![
            TableFieldSchema::new("reference_name"),
            TableFieldSchema::new("start"),
            TableFieldSchema::new("AF"),
            TableFieldSchema::new("filter"),
            TableFieldSchema::new("unknown_column"),
            call,
        ]
    }

    pub fn variants_table() -> Self {
        Self::new(Self::variants_fields())
    }

    pub fn patches(&self) -> Vec<(TableRef, TablePatch)> {
        self.patches.lock().unwrap().clone()
    }
}

#[async_trait]
impl WarehouseApi for FakeWarehouse {
    async fn get_table(&self, _table: &TableRef) -> Result<Table> {
        Ok(self.table.lock().unwrap().clone())
    }

    async fn patch_table(&self, table: &TableRef, patch: &TablePatch) -> Result<Table> {
        self.patches
            .lock()
            .unwrap()
            .push((table.clone(), patch.clone()));
        Ok(self.table.lock().unwrap().clone())
    }
}

/// Source files held in memory, keyed by path
#[derive(Default)]
pub struct FakeStore {
    files: HashMap<String, Vec<u8>>,
    reads: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_string(), contents.into());
        self
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceStore for FakeStore {
    async fn expand(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = wildcard_regex(pattern)?;
        let mut matches: Vec<String> = self
            .files
            .keys()
            .filter(|path| matcher.is_match(path))
            .cloned()
            .collect();
        matches.sort();

        if matches.is_empty() {
            return Err(CliError::SourceNotFound(pattern.to_string()));
        }
        Ok(matches)
    }

    async fn read_head(&self, path: &str, max_bytes: u64) -> Result<Vec<u8>> {
        self.reads.lock().unwrap().push(path.to_string());
        let contents = self
            .files
            .get(path)
            .ok_or_else(|| CliError::SourceNotFound(path.to_string()))?;
        let end = contents.len().min(max_bytes as usize);
        Ok(contents[..end].to_vec())
    }
}

/// Clock that returns immediately and remembers every requested delay
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// A small but complete VCF header
pub const SAMPLE_VCF: &str = "##fileformat=VCFv4.2\n\
##FILTER=<ID=PASS,Description=\"All filters passed\">\n\
##FILTER=<ID=LowQual,Description=\"Low quality\">\n\
##INFO=<ID=AF,Number=A,Type=Float,Description=\"Allele Frequency\">\n\
##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\">\n\
##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Read Depth\">\n\
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA12878\n\
chr1\t100\t.\tA\tG\t50\tPASS\tAF=0.5;DP=10\tGT:DP\t0/1:10\n";
