use anyhow::{Context, Result};
use clap::Parser;
use etl_pipeline::cli::{self, Args};
use etl_pipeline::logging::init_logging;
use etl_pipeline::{EtlConfig, Pipeline, RecordMerger};
use std::process;

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => EtlConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => EtlConfig::default(),
    };
    let config = args.apply_overrides(config);
    config.validate().context("Invalid configuration")?;

    init_logging(&config.paths.log_path, args.verbose)?;

    if args.transform_only {
        let (_, stats) = RecordMerger::from_config(&config.paths.source_dir, &config)
            .process()
            .context("Transform failed")?;
        cli::print_processing_summary(&stats);
        return Ok(());
    }

    let mut pipeline = Pipeline::from_config(config).context("Failed to set up pipeline")?;
    let report = pipeline.run().context("ETL pipeline failed")?;
    cli::print_run_summary(&report);
    Ok(())
}
