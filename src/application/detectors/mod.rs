mod break_of_structure;
mod fair_value_gaps;
mod liquidity_sweeps;
mod momentum;
mod order_blocks;
pub mod raw_features;
pub mod structure_break;

pub use break_of_structure::BreakOfStructureDetector;
pub use fair_value_gaps::FairValueGapDetector;
pub use liquidity_sweeps::LiquiditySweepDetector;
pub use momentum::RsiAugmenter;
pub use order_blocks::OrderBlockDetector;
pub use raw_features::RawFeatureAugmenter;

use crate::domain::config::FeatureConfig;
use crate::domain::errors::FeatureError;
use crate::domain::ports::FeatureDetector;
use std::sync::Arc;

pub struct DetectorFactory;

impl DetectorFactory {
    /// Raw augmenter first, then the optional RSI column, then the four
    /// smart-money detectors. The order only affects column order.
    pub fn create_all(
        config: &FeatureConfig,
    ) -> Result<Vec<Arc<dyn FeatureDetector>>, FeatureError> {
        let mut detectors: Vec<Arc<dyn FeatureDetector>> =
            vec![Arc::new(RawFeatureAugmenter::from_config(&config.raw))];

        if let Some(period) = config.rsi_period {
            detectors.push(Arc::new(RsiAugmenter::new(period)?));
        }

        detectors.extend(Self::create_smc(config));
        Ok(detectors)
    }

    pub fn create_smc(config: &FeatureConfig) -> Vec<Arc<dyn FeatureDetector>> {
        vec![
            Arc::new(OrderBlockDetector::from_config(&config.order_blocks)),
            Arc::new(FairValueGapDetector::from_config(&config.fair_value_gaps)),
            Arc::new(LiquiditySweepDetector::from_config(&config.liquidity_sweeps)),
            Arc::new(BreakOfStructureDetector::from_config(&config.break_of_structure)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detectors() {
        let detectors = DetectorFactory::create_all(&FeatureConfig::default()).unwrap();
        let names: Vec<&str> = detectors.iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec![
                "raw_features",
                "order_blocks",
                "fair_value_gaps",
                "liquidity_sweeps",
                "break_of_structure"
            ]
        );
    }

    #[test]
    fn test_rsi_is_opt_in() {
        let config = FeatureConfig {
            rsi_period: Some(9),
            ..Default::default()
        };
        let detectors = DetectorFactory::create_all(&config).unwrap();
        assert_eq!(detectors[1].name(), "rsi");
        assert_eq!(detectors[1].column_names(), vec!["rsi_9".to_string()]);
    }

    #[test]
    fn test_invalid_rsi_period_fails_construction() {
        let config = FeatureConfig {
            rsi_period: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            DetectorFactory::create_all(&config),
            Err(FeatureError::InvalidConfig { .. })
        ));
    }
}
