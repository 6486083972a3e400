use crate::domain::config::FairValueGapConfig;
use crate::domain::features::FeatureColumn;
use crate::domain::market::PriceSeries;
use crate::domain::ports::FeatureDetector;

/// Fair Value Gap (FVG) detector: imbalances between consecutive bars.
///
/// - Bullish FVG: `low[t] > high[t-1]`, size `(low[t] - high[t-1]) / high[t-1]`
/// - Bearish FVG: `high[t] < low[t-1]`, size `(low[t-1] - high[t]) / low[t-1]`
///
/// Sizes at or below `gap_threshold` are reported as 0. The first bar has no
/// predecessor and is reported as 0 rather than undefined.
#[derive(Debug, Clone)]
pub struct FairValueGapDetector {
    pub gap_threshold: f64,
}

impl FairValueGapDetector {
    pub fn new(gap_threshold: f64) -> Self {
        Self { gap_threshold }
    }

    pub fn from_config(config: &FairValueGapConfig) -> Self {
        Self::new(config.gap_threshold)
    }

    fn significant(&self, gap: f64) -> f64 {
        if gap > self.gap_threshold { gap } else { 0.0 }
    }
}

impl FeatureDetector for FairValueGapDetector {
    fn name(&self) -> &str {
        "fair_value_gaps"
    }

    fn column_names(&self) -> Vec<String> {
        vec!["fvg_bull".to_string(), "fvg_bear".to_string()]
    }

    fn required_bars(&self) -> usize {
        1
    }

    fn detect(&self, series: &PriceSeries) -> Vec<FeatureColumn> {
        let bars = series.bars();
        let mut bull = Vec::with_capacity(bars.len());
        let mut bear = Vec::with_capacity(bars.len());

        if !bars.is_empty() {
            bull.push(Some(0.0));
            bear.push(Some(0.0));
        }

        for pair in bars.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);

            let bull_gap = if curr.low > prev.high {
                (curr.low - prev.high) / prev.high
            } else {
                0.0
            };
            let bear_gap = if curr.high < prev.low {
                (prev.low - curr.high) / prev.low
            } else {
                0.0
            };

            bull.push(Some(self.significant(bull_gap)));
            bear.push(Some(self.significant(bear_gap)));
        }

        vec![
            FeatureColumn::numeric("fvg_bull", bull),
            FeatureColumn::numeric("fvg_bear", bear),
        ]
    }
}
