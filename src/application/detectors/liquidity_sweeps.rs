use super::structure_break::PriorExtremes;
use crate::domain::config::LiquiditySweepConfig;
use crate::domain::features::FeatureColumn;
use crate::domain::market::PriceSeries;
use crate::domain::ports::FeatureDetector;

/// Liquidity sweep detector: a break of the recent extreme that reverses
/// within the same bar.
///
/// - Bullish: `low < prior lowest low` and `(close - open) / open > reversal_threshold`
/// - Bearish: `high > prior highest high` and `(open - close) / open > reversal_threshold`
///
/// Prior extremes cover the `lookback` bars before the current one, so every
/// sweep is also a break of structure.
#[derive(Debug, Clone)]
pub struct LiquiditySweepDetector {
    pub lookback: usize,
    pub reversal_threshold: f64,
}

impl LiquiditySweepDetector {
    pub fn new(lookback: usize, reversal_threshold: f64) -> Self {
        Self {
            lookback,
            reversal_threshold,
        }
    }

    pub fn from_config(config: &LiquiditySweepConfig) -> Self {
        Self::new(config.lookback, config.reversal_threshold)
    }
}

impl FeatureDetector for LiquiditySweepDetector {
    fn name(&self) -> &str {
        "liquidity_sweeps"
    }

    fn column_names(&self) -> Vec<String> {
        vec!["liq_sweep_bull".to_string(), "liq_sweep_bear".to_string()]
    }

    fn required_bars(&self) -> usize {
        self.lookback
    }

    fn detect(&self, series: &PriceSeries) -> Vec<FeatureColumn> {
        let extremes = PriorExtremes::compute(&series.highs(), &series.lows(), self.lookback);

        let (bull, bear): (Vec<bool>, Vec<bool>) = series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let reversal_up = (bar.close - bar.open) / bar.open > self.reversal_threshold;
                let reversal_down = (bar.open - bar.close) / bar.open > self.reversal_threshold;
                (
                    extremes.breaks_below(i, bar.low) && reversal_up,
                    extremes.breaks_above(i, bar.high) && reversal_down,
                )
            })
            .unzip();

        vec![
            FeatureColumn::flag("liq_sweep_bull", bull),
            FeatureColumn::flag("liq_sweep_bear", bear),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::Bar;
    use chrono::{Duration, TimeZone, Utc};

    fn series(bars: &[(f64, f64, f64, f64)]) -> PriceSeries {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        PriceSeries::new(
            bars.iter()
                .enumerate()
                .map(|(i, &(o, h, l, c))| {
                    Bar::new(start + Duration::minutes(i as i64), o, h, l, c, 1000.0)
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_bullish_sweep_breaks_low_and_closes_up() {
        let data = series(&[
            (100.0, 102.0, 99.0, 101.0),
            (101.0, 103.0, 100.0, 102.0),
            // wick below 99, closes 1% above the open
            (100.0, 101.5, 98.0, 101.0),
        ]);
        let columns = LiquiditySweepDetector::new(2, 0.002).detect(&data);
        assert_eq!(columns[0].as_flags().unwrap(), &[false, false, true]);
        assert_eq!(columns[1].as_flags().unwrap(), &[false, false, false]);
    }

    #[test]
    fn test_break_without_reversal_is_not_sweep() {
        let data = series(&[
            (100.0, 102.0, 99.0, 101.0),
            (101.0, 103.0, 100.0, 102.0),
            // breaks the low but closes below the open
            (100.0, 100.5, 97.0, 98.0),
        ]);
        let columns = LiquiditySweepDetector::new(2, 0.002).detect(&data);
        assert!(!columns[0].as_flags().unwrap()[2]);
    }

    #[test]
    fn test_bearish_sweep_breaks_high_and_closes_down() {
        let data = series(&[
            (100.0, 102.0, 99.0, 101.0),
            (101.0, 103.0, 100.0, 102.0),
            (102.0, 104.0, 100.5, 101.0),
        ]);
        let columns = LiquiditySweepDetector::new(2, 0.002).detect(&data);
        assert!(columns[1].as_flags().unwrap()[2]);
        assert!(!columns[0].as_flags().unwrap()[2]);
    }

    #[test]
    fn test_reversal_below_threshold_is_not_sweep() {
        let data = series(&[
            (100.0, 102.0, 99.0, 101.0),
            (101.0, 103.0, 100.0, 102.0),
            // 0.1% body, threshold 0.2%
            (102.0, 104.0, 101.0, 101.898),
        ]);
        let columns = LiquiditySweepDetector::new(2, 0.002).detect(&data);
        assert!(!columns[1].as_flags().unwrap()[2]);
    }
}
