use super::structure_break::PriorExtremes;
use crate::domain::config::BreakOfStructureConfig;
use crate::domain::features::FeatureColumn;
use crate::domain::market::PriceSeries;
use crate::domain::ports::FeatureDetector;

/// Break of Structure (BOS) detector.
///
/// `bos_bull` when the high exceeds the highest high of the previous
/// `lookback` bars, `bos_bear` when the low undercuts the lowest low.
/// No reversal confirmation, see `LiquiditySweepDetector` for that.
#[derive(Debug, Clone)]
pub struct BreakOfStructureDetector {
    pub lookback: usize,
}

impl BreakOfStructureDetector {
    pub fn new(lookback: usize) -> Self {
        Self { lookback }
    }

    pub fn from_config(config: &BreakOfStructureConfig) -> Self {
        Self::new(config.lookback)
    }
}

impl FeatureDetector for BreakOfStructureDetector {
    fn name(&self) -> &str {
        "break_of_structure"
    }

    fn column_names(&self) -> Vec<String> {
        vec!["bos_bull".to_string(), "bos_bear".to_string()]
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
                (
                    extremes.breaks_above(i, bar.high),
                    extremes.breaks_below(i, bar.low),
                )
            })
            .unzip();

        vec![
            FeatureColumn::flag("bos_bull", bull),
            FeatureColumn::flag("bos_bear", bear),
        ]
    }
}
