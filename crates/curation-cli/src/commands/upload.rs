//! `curation upload` command implementation
//!
//! Imports VCFs into a Genomics variant set, exports it to BigQuery and
//! describes the resulting table's columns.

use crate::commands::Services;
use crate::config::Config;
use crate::error::Result;
use crate::progress;
use crate::upload::{TokioClock, UploadWorkflow};
use crate::UploadArgs;
use colored::Colorize;

/// Run the full upload workflow
pub async fn run(config: &Config, args: &UploadArgs) -> Result<()> {
    let config = config.clone().with_poll_interval_secs(args.poll_interval_secs);
    let request = args.to_request();
    let services = Services::connect(&config).await?;
    let clock = TokioClock;

    println!(
        "{} Uploading {} source(s) to {}",
        "→".cyan(),
        request.source_vcfs.len(),
        request.destination_table.to_string().bold()
    );

    let spinner = progress::create_spinner("Starting upload...");
    let result = UploadWorkflow::new(
        &services.genomics,
        &services.warehouse,
        &services.storage,
        &clock,
    )
    .with_poll_interval(config.poll_interval())
    .on_step(|step| spinner.set_message(progress::step_message(step)))
    .run(&request)
    .await;
    spinner.finish_and_clear();

    let report = result?;

    println!("{} Dataset: {}", "✓".green(), report.dataset_id);
    println!("{} Variant set: {}", "✓".green(), report.variant_set_id);
    for (source, operation) in report.sources.iter().zip(&report.import_operations) {
        println!("{} Imported {} ({})", "✓".green(), source, operation.as_str().dimmed());
    }
    println!(
        "{} Exported to {} ({})",
        "✓".green(),
        request.destination_table,
        report.export_operation.as_str().dimmed()
    );
    println!("{} Described {} column(s)", "✓".green(), report.fields_described);

    Ok(())
}
