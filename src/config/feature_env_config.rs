//! Feature configuration parsing from environment variables and TOML files.

use crate::domain::config::{FeatureConfig, WindowAlignment};
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

impl FeatureConfig {
    /// Loads the configuration from environment variables, falling back to
    /// the defaults for every unset key.
    pub fn from_env() -> Result<Self> {
        let defaults = FeatureConfig::default();
        let mut config = defaults.clone();

        config.order_blocks.lookback =
            parse_usize("SMC_OB_LOOKBACK", defaults.order_blocks.lookback)?;
        config.order_blocks.volume_threshold = parse_f64(
            "SMC_OB_VOLUME_THRESHOLD",
            defaults.order_blocks.volume_threshold,
        )?;
        config.order_blocks.alignment = env::var("SMC_OB_ALIGNMENT")
            .unwrap_or_else(|_| defaults.order_blocks.alignment.to_string())
            .parse::<WindowAlignment>()
            .context("Failed to parse SMC_OB_ALIGNMENT")?;

        config.fair_value_gaps.gap_threshold = parse_f64(
            "SMC_FVG_GAP_THRESHOLD",
            defaults.fair_value_gaps.gap_threshold,
        )?;

        config.liquidity_sweeps.lookback =
            parse_usize("SMC_SWEEP_LOOKBACK", defaults.liquidity_sweeps.lookback)?;
        config.liquidity_sweeps.reversal_threshold = parse_f64(
            "SMC_SWEEP_REVERSAL_THRESHOLD",
            defaults.liquidity_sweeps.reversal_threshold,
        )?;

        config.break_of_structure.lookback =
            parse_usize("SMC_BOS_LOOKBACK", defaults.break_of_structure.lookback)?;

        if let Ok(lags) = env::var("FEATURE_LAGS") {
            config.raw.lags = parse_lags(&lags).context("Failed to parse FEATURE_LAGS")?;
        }
        config.raw.volatility_window =
            parse_usize("VOLATILITY_WINDOW", defaults.raw.volatility_window)?;

        config.rsi_period = match env::var("RSI_PERIOD") {
            Ok(v) if !v.trim().is_empty() => Some(
                v.trim()
                    .parse::<usize>()
                    .context("Failed to parse RSI_PERIOD")?,
            ),
            _ => None,
        };

        config.parallel = env::var("FEATURE_PARALLEL")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document. Missing sections and keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FeatureConfig =
            toml::from_str(content).context("Failed to parse feature config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read feature config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .context(format!("Invalid feature config file: {}", path.display()))
    }
}

fn parse_usize(key: &str, default: usize) -> Result<usize> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .context(format!("Failed to parse {}", key))
}

fn parse_f64(key: &str, default: f64) -> Result<f64> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<f64>()
        .context(format!("Failed to parse {}", key))
}

/// Parses a comma separated lag list such as `"1,5,10"`.
fn parse_lags(value: &str) -> Result<Vec<usize>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().context(format!("Invalid lag: {}", s)))
        .collect()
}
