use crate::application::market_data::rolling_window::RollingWindow;
use crate::domain::config::RawFeatureConfig;
use crate::domain::features::FeatureColumn;
use crate::domain::market::PriceSeries;
use crate::domain::ports::FeatureDetector;

/// Raw price/volume features: lags, log returns and rolling volatility.
///
/// For each lag `k`: `close_lag_k` and `volume_lag_k` (undefined for the
/// first `k` bars). `log_return = ln(close[t] / close[t-1])` is undefined on
/// the first bar, and `volatility_{w}` is the sample standard deviation of
/// the last `w` log returns (first defined at bar `w`).
#[derive(Debug, Clone)]
pub struct RawFeatureAugmenter {
    pub lags: Vec<usize>,
    pub volatility_window: usize,
}

impl RawFeatureAugmenter {
    pub fn new(lags: Vec<usize>, volatility_window: usize) -> Self {
        Self {
            lags,
            volatility_window,
        }
    }

    pub fn from_config(config: &RawFeatureConfig) -> Self {
        Self::new(config.lags.clone(), config.volatility_window)
    }
}

fn lagged(values: &[f64], lag: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| i.checked_sub(lag).map(|j| values[j]))
        .collect()
}

/// `ln(close[t] / close[t-1])`, undefined at `t = 0`.
pub fn log_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(closes.len());
    if !closes.is_empty() {
        returns.push(None);
    }
    returns.extend(closes.windows(2).map(|w| Some((w[1] / w[0]).ln())));
    returns
}

impl FeatureDetector for RawFeatureAugmenter {
    fn name(&self) -> &str {
        "raw_features"
    }

    fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.lags.len() * 2 + 2);
        for lag in &self.lags {
            names.push(format!("close_lag_{}", lag));
            names.push(format!("volume_lag_{}", lag));
        }
        names.push("log_return".to_string());
        names.push(format!("volatility_{}", self.volatility_window));
        names
    }

    fn required_bars(&self) -> usize {
        let max_lag = self.lags.iter().copied().max().unwrap_or(0);
        max_lag.max(self.volatility_window) + 1
    }

    fn detect(&self, series: &PriceSeries) -> Vec<FeatureColumn> {
        let closes = series.closes();
        let volumes = series.volumes();
        let mut columns = Vec::with_capacity(self.lags.len() * 2 + 2);

        for &lag in &self.lags {
            columns.push(FeatureColumn::numeric(
                format!("close_lag_{}", lag),
                lagged(&closes, lag),
            ));
            columns.push(FeatureColumn::numeric(
                format!("volume_lag_{}", lag),
                lagged(&volumes, lag),
            ));
        }

        let returns = log_returns(&closes);
        let volatility: Vec<Option<f64>> =
            RollingWindow::trailing(&returns, self.volatility_window).std().collect();

        columns.push(FeatureColumn::numeric("log_return", returns));
        columns.push(FeatureColumn::numeric(
            format!("volatility_{}", self.volatility_window),
            volatility,
        ));
        columns
    }
}
