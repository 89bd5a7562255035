//! VCF upload: Genomics import, BigQuery export, schema descriptions

use crate::api::types::OperationHandle;
use crate::api::{GenomicsApi, WarehouseApi};
use crate::error::{CliError, Result};
use crate::schema::update_table_schema;
use crate::storage::SourceStore;
use crate::upload::poll::{Clock, OperationPoller, RetryPolicy};
use crate::upload::resolve::{find_or_create_dataset, find_or_create_variant_set};
use curation_common::types::TableRef;
use std::fmt;
use std::time::Duration;
use tracing::{info, info_span, Instrument};

/// Default delay between operation status queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Stages of an upload, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    ResolveDataset,
    ResolveVariantSet,
    Import,
    AwaitImports,
    Export,
    AwaitExport,
    UpdateSchema,
    Done,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ResolveDataset => "dataset resolution",
            Self::ResolveVariantSet => "variant set resolution",
            Self::Import | Self::AwaitImports => "import",
            Self::Export | Self::AwaitExport => "export",
            Self::UpdateSchema => "schema update",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What to upload and where
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    /// Local paths or `gs://` URIs, possibly with `*` wildcards
    pub source_vcfs: Vec<String>,
    pub project_id: String,
    /// Dataset name or id
    pub dataset: String,
    /// Variant set name or id
    pub variant_set: String,
    pub destination_table: TableRef,
    pub new_dataset: bool,
    pub new_variant_set: bool,
    /// Expand wildcards locally instead of handing patterns to the import
    pub expand_wildcards: bool,
    pub description: Option<String>,
}

/// Identifiers produced by a finished upload
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowReport {
    pub dataset_id: String,
    pub variant_set_id: String,
    /// Sources as submitted for import
    pub sources: Vec<String>,
    pub import_operations: Vec<OperationHandle>,
    pub export_operation: OperationHandle,
    pub fields_described: usize,
}

type StepObserver<'a> = Box<dyn Fn(WorkflowStep) + Send + Sync + 'a>;

/// Runs one upload against the remote services.
///
/// Steps run strictly in sequence and nothing is rolled back on failure:
/// records created before the failing step stay in place.
pub struct UploadWorkflow<'a> {
    genomics: &'a dyn GenomicsApi,
    warehouse: &'a dyn WarehouseApi,
    store: &'a dyn SourceStore,
    clock: &'a dyn Clock,
    poll_interval: Duration,
    retry: RetryPolicy,
    observer: Option<StepObserver<'a>>,
}

impl<'a> UploadWorkflow<'a> {
    pub fn new(
        genomics: &'a dyn GenomicsApi,
        warehouse: &'a dyn WarehouseApi,
        store: &'a dyn SourceStore,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            genomics,
            warehouse,
            store,
            clock,
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry: RetryPolicy::default(),
            observer: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Called on entering each step
    pub fn on_step(mut self, observer: impl Fn(WorkflowStep) + Send + Sync + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub async fn run(&self, request: &UploadRequest) -> Result<WorkflowReport> {
        let span = info_span!(
            "upload",
            dataset = %request.dataset,
            variant_set = %request.variant_set,
            destination = %request.destination_table
        );
        self.run_steps(request).instrument(span).await
    }

    async fn run_steps(&self, request: &UploadRequest) -> Result<WorkflowReport> {
        let header_source = request
            .source_vcfs
            .first()
            .ok_or_else(|| CliError::config("at least one source VCF is required"))?;

        self.enter(WorkflowStep::ResolveDataset);
        let dataset_id = find_or_create_dataset(
            self.genomics,
            &request.project_id,
            &request.dataset,
            request.new_dataset,
        )
        .await?;

        self.enter(WorkflowStep::ResolveVariantSet);
        let variant_set_id = find_or_create_variant_set(
            self.genomics,
            &dataset_id,
            &request.variant_set,
            &request.source_vcfs.join("\t"),
            request.new_variant_set,
        )
        .await?;

        let sources = self.import_sources(request).await?;

        self.enter(WorkflowStep::Import);
        let mut import_operations = Vec::with_capacity(sources.len());
        for source in &sources {
            let handle = self
                .genomics
                .import_variants(&variant_set_id, std::slice::from_ref(source))
                .await?;
            info!(source = %source, operation = %handle, "Submitted import");
            import_operations.push(handle);
        }

        self.enter(WorkflowStep::AwaitImports);
        for handle in &import_operations {
            self.await_success(handle, WorkflowStep::AwaitImports).await?;
        }

        self.enter(WorkflowStep::Export);
        let export_operation = self
            .genomics
            .export_variant_set(&variant_set_id, &request.destination_table)
            .await?;
        info!(operation = %export_operation, "Submitted export");

        self.enter(WorkflowStep::AwaitExport);
        self.await_success(&export_operation, WorkflowStep::AwaitExport)
            .await?;

        // Every input is assumed to share the header of the first one
        self.enter(WorkflowStep::UpdateSchema);
        let schema_source = sources.first().unwrap_or(header_source);
        let fields_described = update_table_schema(
            self.warehouse,
            self.store,
            &request.destination_table,
            schema_source,
            request.description.as_deref(),
        )
        .await?;

        self.enter(WorkflowStep::Done);
        Ok(WorkflowReport {
            dataset_id,
            variant_set_id,
            sources,
            import_operations,
            export_operation,
            fields_described,
        })
    }

    async fn import_sources(&self, request: &UploadRequest) -> Result<Vec<String>> {
        if !request.expand_wildcards {
            return Ok(request.source_vcfs.clone());
        }

        let mut sources = Vec::new();
        for pattern in &request.source_vcfs {
            sources.extend(self.store.expand(pattern).await?);
        }
        info!(patterns = request.source_vcfs.len(), sources = sources.len(), "Expanded source wildcards");
        Ok(sources)
    }

    async fn await_success(&self, handle: &OperationHandle, step: WorkflowStep) -> Result<()> {
        let outcome = OperationPoller::new(self.genomics, self.clock, self.poll_interval)
            .with_retry_policy(self.retry)
            .wait(handle)
            .await?;

        if outcome.is_success() {
            Ok(())
        } else {
            Err(CliError::operation_failed(step, handle.as_str()))
        }
    }

    fn enter(&self, step: WorkflowStep) {
        info!(%step, "Upload step");
        if let Some(observer) = &self.observer {
            observer(step);
        }
    }
}
