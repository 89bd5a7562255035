//! all-possible-snps - reference conversion and annotation query rendering

use anyhow::Result;
use clap::{Parser, Subcommand};
use curation_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use curation_common::types::TableRef;
use curation_snps::sql::{self, GenomeBuild, Templates, DEFAULT_OUTPUT};
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "all-possible-snps")]
#[command(author, version, about = "Build an annotated all-possible-SNPs table")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert FASTA on stdin to `>header>offset>bases` lines on stdout
    FastaToKv,

    /// Render the annotation JOIN query and print a query to check its result
    RenderSql {
        /// Reference sequence table (PROJECT.DATASET.TABLE) loaded from fasta-to-kv output
        #[arg(long, alias = "sequence_table")]
        sequence_table: TableRef,

        /// Use annotation tables aligned to build 37 of the human reference (default)
        #[arg(long, conflicts_with = "b38")]
        b37: bool,

        /// Use annotation tables aligned to build 38 of the human reference
        #[arg(long)]
        b38: bool,

        /// File to write the rendered JOIN query to
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Restrict the query to a small region for testing
        #[arg(long)]
        debug: bool,

        /// JOIN query template (defaults to the bundled one)
        #[arg(long)]
        join_template: Option<PathBuf>,

        /// Check query template (defaults to the bundled one)
        #[arg(long)]
        check_template: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Console logs go to stderr; stdout carries data
    let log_config = LogConfig::builder()
        .level(log_level)
        .output(LogOutput::Console)
        .log_file_prefix("all-possible-snps")
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    match cli.command {
        Command::FastaToKv => {
            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            let stats = curation_snps::fasta_to_kv(BufReader::new(stdin), BufWriter::new(stdout))?;
            info!(
                records = stats.records,
                lines = stats.sequence_lines,
                bases = stats.bases,
                "Conversion complete"
            );
        },
        Command::RenderSql {
            sequence_table,
            b37: _,
            b38,
            output,
            debug: debug_region,
            join_template,
            check_template,
        } => {
            let build = if b38 { GenomeBuild::B38 } else { GenomeBuild::B37 };
            info!(%build, debug_region, "Rendering annotation queries");

            let templates = Templates::load(join_template.as_deref(), check_template.as_deref())?;
            let replacements = build.replacements(&sequence_table, debug_region);
            let check_query = sql::write_join_query(&templates, &replacements, &output)?;

            print!("{}", sql::usage_message(&output, &check_query));
        },
    }

    Ok(())
}
