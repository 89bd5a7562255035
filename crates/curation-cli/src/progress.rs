//! Progress indicators for long-running uploads
//!
//! Spinners draw on stderr and are hidden automatically when it is not a
//! terminal.

use crate::upload::WorkflowStep;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate operations
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Spinner text for an upload step
pub fn step_message(step: WorkflowStep) -> &'static str {
    match step {
        WorkflowStep::ResolveDataset => "Resolving dataset...",
        WorkflowStep::ResolveVariantSet => "Resolving variant set...",
        WorkflowStep::Import => "Submitting imports...",
        WorkflowStep::AwaitImports => "Waiting for imports to finish...",
        WorkflowStep::Export => "Submitting export to BigQuery...",
        WorkflowStep::AwaitExport => "Waiting for export to finish...",
        WorkflowStep::UpdateSchema => "Updating column descriptions...",
        WorkflowStep::Done => "Done",
    }
}
