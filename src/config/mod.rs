//! Configuration module.
//!
//! Loads the feature pipeline configuration (environment variables or a TOML
//! file) and the observability settings.

mod feature_env_config;
mod observability_config;

pub use crate::domain::config::{FeatureConfig, WindowAlignment};
pub use observability_config::ObservabilityEnvConfig;

use anyhow::Result;
use std::path::Path;

/// Loads `.env` if present, then reads the configuration from `path` when
/// given, otherwise from the environment.
pub fn load_feature_config(path: Option<&Path>) -> Result<FeatureConfig> {
    dotenvy::dotenv().ok();
    match path {
        Some(path) => FeatureConfig::from_toml_file(path),
        None => FeatureConfig::from_env(),
    }
}
