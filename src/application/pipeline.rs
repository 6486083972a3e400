//! Feature pipeline driver
//!
//! Runs every configured detector over the same immutable price series,
//! appends their columns to a new `FeatureTable`, then drops every row that
//! still has an undefined value.

use crate::application::detectors::DetectorFactory;
use crate::domain::config::FeatureConfig;
use crate::domain::errors::FeatureError;
use crate::domain::features::{FeatureColumn, FeatureTable};
use crate::domain::market::PriceSeries;
use crate::domain::ports::FeatureDetector;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct FeaturePipeline {
    detectors: Vec<Arc<dyn FeatureDetector>>,
    parallel: bool,
}

impl std::fmt::Debug for FeaturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturePipeline")
            .field("detectors", &self.detector_names())
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl FeaturePipeline {
    pub fn new(detectors: Vec<Arc<dyn FeatureDetector>>) -> Self {
        Self {
            detectors,
            parallel: false,
        }
    }

    pub fn from_config(config: &FeatureConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        Ok(Self::new(DetectorFactory::create_all(config)?).with_parallel(config.parallel))
    }

    /// Run detectors concurrently on the rayon pool. Output is identical to
    /// sequential execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Removes the detector called `name`, leaving the others untouched.
    pub fn without(mut self, name: &str) -> Self {
        self.detectors.retain(|d| d.name() != name);
        self
    }

    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// All output column names, in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.detectors.iter().flat_map(|d| d.column_names()).collect()
    }

    /// Bars needed so that at least one row is fully defined.
    pub fn required_bars(&self) -> usize {
        self.detectors
            .iter()
            .map(|d| d.required_bars())
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Annotates the series without dropping incomplete rows.
    pub fn annotate(&self, series: &PriceSeries) -> Result<FeatureTable, FeatureError> {
        let required = self.required_bars();
        if series.len() < required {
            return Err(FeatureError::InsufficientData {
                required,
                available: series.len(),
            });
        }

        for detector in self.detectors.iter().filter(|d| d.uses_lookahead()) {
            warn!(
                "Detector {} reads future bars; output is not suitable for live use",
                detector.name()
            );
        }

        let run = |detector: &Arc<dyn FeatureDetector>| -> Vec<FeatureColumn> {
            let columns = detector.detect(series);
            debug!(
                "Detector {} produced {} column(s)",
                detector.name(),
                columns.len()
            );
            columns
        };

        let outputs: Vec<Vec<FeatureColumn>> = if self.parallel {
            self.detectors.par_iter().map(run).collect()
        } else {
            self.detectors.iter().map(run).collect()
        };

        FeatureTable::from_series(series).with_columns(outputs.into_iter().flatten())
    }

    /// Annotates the series and keeps only fully-defined rows.
    pub fn build(&self, series: &PriceSeries) -> Result<FeatureTable, FeatureError> {
        info!(
            "Adding features to {} bars ({} detectors)...",
            series.len(),
            self.detectors.len()
        );
        let annotated = self.annotate(series)?;
        let table = annotated.drop_incomplete();
        info!(
            "Features added: {} columns, {} rows kept, {} dropped for missing history",
            table.columns().len(),
            table.len(),
            annotated.len() - table.len()
        );
        Ok(table)
    }
}

/// Builds the full feature table for `series` with `config`.
pub fn build_feature_table(
    series: &PriceSeries,
    config: &FeatureConfig,
) -> Result<FeatureTable, FeatureError> {
    FeaturePipeline::from_config(config)?.build(series)
}
