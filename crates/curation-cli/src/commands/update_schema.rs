//! `curation update-schema` command implementation

use crate::commands::Services;
use crate::config::Config;
use crate::error::Result;
use crate::schema::update_table_schema;
use crate::UpdateSchemaArgs;
use colored::Colorize;

/// Describe an existing variants table from a VCF header
pub async fn run(config: &Config, args: &UpdateSchemaArgs) -> Result<()> {
    let services = Services::connect(config).await?;

    let described = update_table_schema(
        &services.warehouse,
        &services.storage,
        &args.destination_table,
        &args.source_vcf,
        args.description.as_deref(),
    )
    .await?;

    println!(
        "{} Updated {} ({} column(s) described)",
        "✓".green(),
        args.destination_table.to_string().bold(),
        described
    );

    Ok(())
}
