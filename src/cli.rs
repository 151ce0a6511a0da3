//! Command-line interface components.

use crate::config::{EtlConfig, ParseErrorPolicy};
use crate::models::{ProcessingStats, RunReport};
use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "etl_pipeline")]
#[command(about = "Merge CSV, JSON-lines and XML person records into one CSV and load it")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory holding the raw source files
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path of the transformed CSV
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Abort on the first file that fails to parse instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Only merge the source directory; no object storage or database
    #[arg(long)]
    pub transform_only: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, mut config: EtlConfig) -> EtlConfig {
        if let Some(source) = &self.source {
            config = config.with_source_dir(source);
        }
        if let Some(output) = &self.output {
            config = config.with_output_path(output);
        }
        if self.strict {
            config = config.with_parse_error_policy(ParseErrorPolicy::Abort);
        }
        config
    }
}

/// Print the merge counters
pub fn print_processing_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {} ({} ignored)",
        "Files parsed:".bright_cyan(),
        stats.files_parsed.to_string().bright_white(),
        stats.files_ignored
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {} ({} duplicates removed)",
        "Total rows:".bright_cyan(),
        stats.total_rows.to_string().bright_white().bold(),
        stats.duplicates_removed()
    );
    print_path("Output:", &stats.output_path);
}

/// Print the per-step counts of a full run
pub fn print_run_summary(report: &RunReport) {
    print_processing_summary(&report.transform);
    println!(
        "  {} {} uploaded, {} downloaded",
        "Raw files:".bright_cyan(),
        report.raw_uploaded.to_string().bright_white(),
        report.raw_downloaded.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Transformed key:".bright_cyan(),
        report.transformed_key.bright_white()
    );
    println!(
        "  {} {} rows into {}",
        "Loaded:".bright_cyan(),
        report.rows_loaded.to_string().bright_white().bold(),
        report.table.bright_white()
    );
    match &report.log_key {
        Some(key) => println!("  {} {}", "Log key:".bright_cyan(), key.bright_white()),
        None => println!("  {} {}", "Log key:".bright_cyan(), "not uploaded".bright_yellow()),
    }
    println!(
        "  {} {}ms (started {})",
        "Run time:".bright_cyan(),
        report.elapsed_ms.to_string().bright_white(),
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

fn print_path(label: &str, path: &Path) {
    println!("  {} {}", label.bright_cyan(), path.display().to_string().bright_white());
}
