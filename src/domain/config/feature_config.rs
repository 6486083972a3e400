//! Feature Configuration Domain Value Object
//!
//! Parameters for every detector and augmenter of the feature pipeline.
//! Defaults reproduce the reference feature set.

use crate::domain::errors::FeatureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placement of a rolling window relative to the bar it reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowAlignment {
    /// Window ends at the current bar (causal).
    #[default]
    #[serde(alias = "causal")]
    Trailing,
    /// Window straddles the current bar and reads future bars.
    Centered,
}

impl FromStr for WindowAlignment {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trailing" | "causal" => Ok(WindowAlignment::Trailing),
            "centered" | "center" => Ok(WindowAlignment::Centered),
            _ => Err(FeatureError::InvalidConfig {
                reason: format!(
                    "Invalid alignment: {}. Must be 'trailing' (or 'causal') or 'centered'",
                    s
                ),
            }),
        }
    }
}

impl fmt::Display for WindowAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowAlignment::Trailing => write!(f, "trailing"),
            WindowAlignment::Centered => write!(f, "centered"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBlockConfig {
    pub lookback: usize,
    /// Volume must exceed this multiple of the trailing mean volume.
    pub volume_threshold: f64,
    /// Pivot window placement. `Centered` is the reference behavior and
    /// looks `lookback / 2` bars into the future.
    pub alignment: WindowAlignment,
}

impl Default for OrderBlockConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            volume_threshold: 1.5,
            alignment: WindowAlignment::Centered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairValueGapConfig {
    /// Relative gaps at or below this size are reported as zero.
    pub gap_threshold: f64,
}

impl Default for FairValueGapConfig {
    fn default() -> Self {
        Self {
            gap_threshold: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquiditySweepConfig {
    pub lookback: usize,
    /// Minimum same-bar body move, relative to the open.
    pub reversal_threshold: f64,
}

impl Default for LiquiditySweepConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            reversal_threshold: 0.002,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakOfStructureConfig {
    pub lookback: usize,
}

impl Default for BreakOfStructureConfig {
    fn default() -> Self {
        Self { lookback: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFeatureConfig {
    pub lags: Vec<usize>,
    pub volatility_window: usize,
}

impl Default for RawFeatureConfig {
    fn default() -> Self {
        Self {
            lags: vec![1, 5, 10],
            volatility_window: 20,
        }
    }
}

/// Feature pipeline configuration value object
///
/// # Invariants
///
/// - All lookbacks, lags and periods must be > 0
/// - `raw.volatility_window` must be >= 2 (sample standard deviation)
/// - All thresholds must be finite and >= 0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FeatureConfig {
    pub order_blocks: OrderBlockConfig,
    pub fair_value_gaps: FairValueGapConfig,
    pub liquidity_sweeps: LiquiditySweepConfig,
    pub break_of_structure: BreakOfStructureConfig,
    pub raw: RawFeatureConfig,
    /// Adds an `rsi_{period}` column when set.
    pub rsi_period: Option<usize>,
    /// Run detectors concurrently on the rayon pool.
    pub parallel: bool,
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), FeatureError> {
        self.validate_period("order_blocks.lookback", self.order_blocks.lookback)?;
        self.validate_period("liquidity_sweeps.lookback", self.liquidity_sweeps.lookback)?;
        self.validate_period(
            "break_of_structure.lookback",
            self.break_of_structure.lookback,
        )?;
        for lag in &self.raw.lags {
            self.validate_period("raw.lags", *lag)?;
        }
        if self.raw.volatility_window < 2 {
            return Err(FeatureError::InvalidConfig {
                reason: format!(
                    "raw.volatility_window = {}. Must be >= 2",
                    self.raw.volatility_window
                ),
            });
        }
        if let Some(period) = self.rsi_period {
            self.validate_period("rsi_period", period)?;
        }

        self.validate_threshold(
            "order_blocks.volume_threshold",
            self.order_blocks.volume_threshold,
        )?;
        self.validate_threshold(
            "fair_value_gaps.gap_threshold",
            self.fair_value_gaps.gap_threshold,
        )?;
        self.validate_threshold(
            "liquidity_sweeps.reversal_threshold",
            self.liquidity_sweeps.reversal_threshold,
        )?;

        Ok(())
    }

    fn validate_period(&self, field: &str, value: usize) -> Result<(), FeatureError> {
        if value == 0 {
            return Err(FeatureError::InvalidConfig {
                reason: format!("{} = {}. Must be > 0", field, value),
            });
        }
        Ok(())
    }

    fn validate_threshold(&self, field: &str, value: f64) -> Result<(), FeatureError> {
        if !value.is_finite() || value < 0.0 {
            return Err(FeatureError::InvalidConfig {
                reason: format!("{} = {}. Must be a non-negative number", field, value),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeatureConfig::default();
        assert_eq!(config.order_blocks.lookback, 20);
        assert_eq!(config.order_blocks.volume_threshold, 1.5);
        assert_eq!(config.order_blocks.alignment, WindowAlignment::Centered);
        assert_eq!(config.fair_value_gaps.gap_threshold, 0.001);
        assert_eq!(config.liquidity_sweeps.reversal_threshold, 0.002);
        assert_eq!(config.raw.lags, vec![1, 5, 10]);
        assert_eq!(config.rsi_period, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_period() {
        let mut config = FeatureConfig::default();
        config.break_of_structure.lookback = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("break_of_structure.lookback"));
    }

    #[test]
    fn test_invalid_lag_and_window() {
        let mut config = FeatureConfig::default();
        config.raw.lags = vec![1, 0];
        assert!(config.validate().is_err());

        let mut config = FeatureConfig::default();
        config.raw.volatility_window = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_threshold() {
        let mut config = FeatureConfig::default();
        config.fair_value_gaps.gap_threshold = -0.1;
        assert!(config.validate().is_err());

        let mut config = FeatureConfig::default();
        config.liquidity_sweeps.reversal_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_alignment_parsing() {
        assert_eq!(
            "causal".parse::<WindowAlignment>().unwrap(),
            WindowAlignment::Trailing
        );
        assert_eq!(
            "Centered".parse::<WindowAlignment>().unwrap(),
            WindowAlignment::Centered
        );
        assert!("sideways".parse::<WindowAlignment>().is_err());
    }
}
