use crate::application::pipeline::FeaturePipeline;
use crate::domain::features::FeatureTable;
use crate::infrastructure::csv_store;
use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One input file and where its feature table goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl BatchJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// `<dir>/<stem>_with_features.csv`, with `dir` defaulting to the input's directory.
    pub fn with_default_output(input: impl Into<PathBuf>, dir: Option<&Path>) -> Self {
        let input = input.into();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let file_name = format!("{}_with_features.csv", stem);
        let output = match dir {
            Some(dir) => dir.join(file_name),
            None => input.with_file_name(file_name),
        };
        Self { input, output }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub bars_read: usize,
    pub rows_written: usize,
    pub columns: usize,
    /// Leading rows of the written table, when a preview was requested
    pub preview: Option<FeatureTable>,
}

/// Result of a single file in a batch
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub job: BatchJob,
    pub result: Result<BatchSummary, String>,
}

/// Builds feature tables for several CSV files concurrently.
///
/// Each file is independent: a failure is captured in its `BatchResult` and
/// the remaining files still run.
pub struct BatchRunner {
    pipeline: FeaturePipeline,
    preview_rows: usize,
}

impl BatchRunner {
    pub fn new(pipeline: FeaturePipeline) -> Self {
        Self {
            pipeline,
            preview_rows: 0,
        }
    }

    /// Keep the first `rows` rows of each table in its `BatchSummary`.
    pub fn with_preview(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn run(&self, jobs: Vec<BatchJob>) -> Vec<BatchResult> {
        jobs.into_par_iter()
            .map(|job| {
                let result = self.run_single(&job).map_err(|e| format!("{:#}", e));
                match &result {
                    Ok(summary) => info!(
                        "{} -> {} ({} rows)",
                        job.input.display(),
                        job.output.display(),
                        summary.rows_written
                    ),
                    Err(e) => error!("{}: {}", job.input.display(), e),
                }
                BatchResult { job, result }
            })
            .collect()
    }

    pub fn run_single(&self, job: &BatchJob) -> Result<BatchSummary> {
        let series = csv_store::read_price_series_file(&job.input)?;
        let table = self.pipeline.build(&series)?;
        csv_store::write_feature_table_file(&job.output, &table)?;

        Ok(BatchSummary {
            bars_read: series.len(),
            rows_written: table.len(),
            columns: table.columns().len(),
            preview: (self.preview_rows > 0).then(|| table.head(self.preview_rows)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::FeatureConfig;
    use std::fs;

    fn write_input(path: &Path, bars: usize) {
        let mut content = String::from("timestamp,open,high,low,close,volume\n");
        for i in 0..bars {
            let base = 100.0 + (i as f64 * 0.7).sin() * 5.0;
            content.push_str(&format!(
                "{},{},{},{},{},{}\n",
                1_700_000_000_000i64 + i as i64 * 60_000,
                base,
                base + 1.0,
                base - 1.0,
                base + 0.5,
                1000.0 + (i % 7) as f64 * 100.0
            ));
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_default_output_path() {
        let job = BatchJob::with_default_output("data/BTCUSDT_1m.csv", None);
        assert_eq!(job.output, PathBuf::from("data/BTCUSDT_1m_with_features.csv"));

        let job = BatchJob::with_default_output("data/BTCUSDT_1m.csv", Some(Path::new("out")));
        assert_eq!(job.output, PathBuf::from("out/BTCUSDT_1m_with_features.csv"));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let dir = std::env::temp_dir().join(format!("smc_batch_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.csv");
        let short = dir.join("short.csv");
        write_input(&good, 40);
        write_input(&short, 5);

        let pipeline = FeaturePipeline::from_config(&FeatureConfig::default()).unwrap();
        let runner = BatchRunner::new(pipeline);
        let results = runner.run(vec![
            BatchJob::with_default_output(&good, None),
            BatchJob::with_default_output(&short, None),
            BatchJob::with_default_output(dir.join("missing.csv"), None),
        ]);

        assert_eq!(results.len(), 3);
        let summary = results[0].result.as_ref().unwrap();
        assert_eq!(summary.bars_read, 40);
        assert_eq!(summary.rows_written, 20);
        assert!(dir.join("good_with_features.csv").exists());

        assert!(summary.preview.is_none());

        assert!(results[1].result.as_ref().unwrap_err().contains("Insufficient data"));
        assert!(results[2].result.is_err());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_preview_comes_from_the_written_table() {
        let dir = std::env::temp_dir().join(format!("smc_preview_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("prices.csv");
        write_input(&input, 30);

        let pipeline = FeaturePipeline::from_config(&FeatureConfig::default()).unwrap();
        let job = BatchJob::with_default_output(&input, None);
        let summary = BatchRunner::new(pipeline.clone())
            .with_preview(3)
            .run_single(&job)
            .unwrap();

        let preview = summary.preview.unwrap();
        assert_eq!(preview.len(), 3);
        let full = pipeline
            .build(&csv_store::read_price_series_file(&input).unwrap())
            .unwrap();
        assert_eq!(preview, full.head(3));

        fs::remove_dir_all(&dir).ok();
    }
}
