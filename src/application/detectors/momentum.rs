use crate::domain::errors::FeatureError;
use crate::domain::features::FeatureColumn;
use crate::domain::market::PriceSeries;
use crate::domain::ports::FeatureDetector;
use ta::Next;
use ta::indicators::RelativeStrengthIndex;

/// RSI over closes, computed with `ta`.
///
/// The first `period` bars are reported as undefined, the same warm-up as
/// TA-Lib's RSI. Values are not TA-Lib's: `ta` smooths gains and losses with
/// a standard EMA (`alpha = 2 / (period + 1)`), TA-Lib with Wilder's
/// smoothing (`alpha = 1 / period`), so the two diverge for the same period.
#[derive(Debug, Clone)]
pub struct RsiAugmenter {
    pub period: usize,
    indicator: RelativeStrengthIndex,
}

impl RsiAugmenter {
    pub fn new(period: usize) -> Result<Self, FeatureError> {
        let indicator =
            RelativeStrengthIndex::new(period).map_err(|e| FeatureError::InvalidConfig {
                reason: format!("rsi_period = {}: {:?}", period, e),
            })?;
        Ok(Self { period, indicator })
    }

    fn column_name(&self) -> String {
        format!("rsi_{}", self.period)
    }
}

impl FeatureDetector for RsiAugmenter {
    fn name(&self) -> &str {
        "rsi"
    }

    fn column_names(&self) -> Vec<String> {
        vec![self.column_name()]
    }

    fn required_bars(&self) -> usize {
        self.period + 1
    }

    fn detect(&self, series: &PriceSeries) -> Vec<FeatureColumn> {
        // fresh state for every series
        let mut rsi = self.indicator.clone();

        let values = series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let value = rsi.next(bar.close);
                (i >= self.period).then_some(value)
            })
            .collect();

        vec![FeatureColumn::numeric(self.column_name(), values)]
    }
}
