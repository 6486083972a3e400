use crate::application::market_data::rolling_window::RollingWindow;
use crate::domain::config::{OrderBlockConfig, WindowAlignment};
use crate::domain::features::FeatureColumn;
use crate::domain::market::PriceSeries;
use crate::domain::ports::FeatureDetector;

/// Order Block (OB) detector: high-volume reversal zones.
///
/// A bar is a pivot high when its high equals the rolling max of highs over
/// `lookback` bars (pivot low: low equals the rolling min of lows). It is
/// flagged `ob_high` / `ob_low` when it is a pivot AND its volume exceeds
/// `volume_threshold` times the trailing mean volume over `lookback` bars,
/// current bar included.
///
/// With `WindowAlignment::Centered` (the default) the pivot window reads up
/// to `(lookback - 1) / 2` future bars. Fine for offline feature
/// generation; a streaming consumer must use `Trailing` instead.
#[derive(Debug, Clone)]
pub struct OrderBlockDetector {
    pub lookback: usize,
    pub volume_threshold: f64,
    pub alignment: WindowAlignment,
}

impl OrderBlockDetector {
    pub fn new(lookback: usize, volume_threshold: f64, alignment: WindowAlignment) -> Self {
        Self {
            lookback,
            volume_threshold,
            alignment,
        }
    }

    pub fn from_config(config: &OrderBlockConfig) -> Self {
        Self::new(config.lookback, config.volume_threshold, config.alignment)
    }
}

impl FeatureDetector for OrderBlockDetector {
    fn name(&self) -> &str {
        "order_blocks"
    }

    fn column_names(&self) -> Vec<String> {
        vec!["ob_high".to_string(), "ob_low".to_string()]
    }

    fn required_bars(&self) -> usize {
        self.lookback
    }

    fn uses_lookahead(&self) -> bool {
        self.alignment == WindowAlignment::Centered
    }

    fn detect(&self, series: &PriceSeries) -> Vec<FeatureColumn> {
        let highs = series.highs();
        let lows = series.lows();
        let volumes = series.volumes();

        let pivot_high = RollingWindow::new(&highs, self.lookback, self.alignment).max();
        let pivot_low = RollingWindow::new(&lows, self.lookback, self.alignment).min();
        let avg_volume = RollingWindow::trailing(&volumes, self.lookback).mean();

        let mut ob_high = Vec::with_capacity(series.len());
        let mut ob_low = Vec::with_capacity(series.len());

        let windows = pivot_high.zip(pivot_low).zip(avg_volume).enumerate();
        for (i, ((max_high, min_low), avg_vol)) in windows {
            let high_volume =
                matches!(avg_vol, Some(avg) if volumes[i] > avg * self.volume_threshold);
            ob_high.push(high_volume && max_high == Some(highs[i]));
            ob_low.push(high_volume && min_low == Some(lows[i]));
        }

        vec![
            FeatureColumn::flag("ob_high", ob_high),
            FeatureColumn::flag("ob_low", ob_low),
        ]
    }
}
