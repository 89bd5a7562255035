//! VCF to BigQuery upload orchestration
//!
//! Resolves (or creates) a dataset and variant set, imports every source
//! VCF, exports the variant set to a BigQuery table and finally describes
//! the table's columns from the first VCF's header.

pub mod poll;
pub mod resolve;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use poll::{Clock, OperationOutcome, OperationPoller, RetryPolicy, TokioClock};
pub use resolve::{find_id_or_name, find_or_create_dataset, find_or_create_variant_set, NamedResource};
pub use workflow::{UploadRequest, UploadWorkflow, WorkflowReport, WorkflowStep, DEFAULT_POLL_INTERVAL};
