use anyhow::{Result, bail};
use clap::Parser;
use smc_features::application::batch::{BatchJob, BatchRunner};
use smc_features::application::pipeline::FeaturePipeline;
use smc_features::config::{ObservabilityEnvConfig, load_feature_config};
use smc_features::domain::features::{ColumnValues, FeatureTable};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Adds Smart Money Concepts features to OHLCV CSV files", long_about = None)]
struct Args {
    /// Input OHLCV CSV file(s)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output CSV path (single input only)
    #[arg(short, long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Directory for `<stem>_with_features.csv` outputs (defaults to each input's directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// TOML feature configuration. Environment variables are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run detectors concurrently within each file
    #[arg(long)]
    parallel: bool,

    /// Print the first N rows of each feature table
    #[arg(long, default_value_t = 0)]
    preview: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_feature_config(args.config.as_deref())?;
    ObservabilityEnvConfig::from_env().init_tracing();

    if args.parallel {
        config.parallel = true;
    }

    if args.output.is_some() && args.inputs.len() > 1 {
        bail!("--output can only be used with a single input file; use --output-dir instead");
    }
    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let pipeline = FeaturePipeline::from_config(&config)?;
    info!("Feature pipeline: {:?}", pipeline);

    let jobs: Vec<BatchJob> = args
        .inputs
        .iter()
        .map(|input| match &args.output {
            Some(output) => BatchJob::new(input, output),
            None => BatchJob::with_default_output(input, args.output_dir.as_deref()),
        })
        .collect();

    let results = BatchRunner::new(pipeline).with_preview(args.preview).run(jobs);

    let mut failures = 0;
    for result in &results {
        match &result.result {
            Ok(summary) => {
                println!(
                    "{}: {} bars -> {} rows x {} features -> {}",
                    result.job.input.display(),
                    summary.bars_read,
                    summary.rows_written,
                    summary.columns,
                    result.job.output.display()
                );
                if let Some(preview) = &summary.preview {
                    print_preview(preview);
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: FAILED: {}", result.job.input.display(), e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} file(s) failed", failures, results.len());
    }
    Ok(())
}

/// Prints the feature list, then each row with its active flags.
fn print_preview(table: &FeatureTable) {
    println!("  features: {}", table.column_names().join(", "));
    for row in 0..table.len() {
        let bar = &table.bars()[row];
        let active: Vec<&str> = table
            .columns()
            .iter()
            .filter(|c| matches!(&c.values, ColumnValues::Flag(v) if v[row]))
            .map(|c| c.name.as_str())
            .collect();
        println!(
            "  {} close={:.4} [{}]",
            bar.timestamp.format("%Y-%m-%d %H:%M:%S"),
            bar.close,
            active.join(", ")
        );
    }
}
