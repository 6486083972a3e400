use crate::application::market_data::rolling_window::RollingWindow;

/// Highest high and lowest low of the `lookback` bars strictly before each bar.
///
/// Shared by the break-of-structure and liquidity-sweep detectors. A bar
/// without a full prior window never counts as a break.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorExtremes {
    pub prior_high: Vec<Option<f64>>,
    pub prior_low: Vec<Option<f64>>,
}

impl PriorExtremes {
    pub fn compute(highs: &[f64], lows: &[f64], lookback: usize) -> Self {
        Self {
            prior_high: RollingWindow::trailing(highs, lookback).shift(1).max().collect(),
            prior_low: RollingWindow::trailing(lows, lookback).shift(1).min().collect(),
        }
    }

    /// `high` exceeds the prior highest high at `index`.
    pub fn breaks_above(&self, index: usize, high: f64) -> bool {
        matches!(self.prior_high.get(index), Some(Some(prior)) if high > *prior)
    }

    /// `low` undercuts the prior lowest low at `index`.
    pub fn breaks_below(&self, index: usize, low: f64) -> bool {
        matches!(self.prior_low.get(index), Some(Some(prior)) if low < *prior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prior_extremes_exclude_current_bar() {
        let highs = [105.0, 110.0, 109.0, 111.0];
        let lows = [98.0, 101.0, 95.0, 100.0];
        let extremes = PriorExtremes::compute(&highs, &lows, 2);

        assert_eq!(extremes.prior_high, vec![None, None, Some(110.0), Some(110.0)]);
        assert_eq!(extremes.prior_low, vec![None, None, Some(98.0), Some(95.0)]);

        assert!(!extremes.breaks_above(2, 109.0));
        assert!(extremes.breaks_below(2, 95.0));
        assert!(extremes.breaks_above(3, 111.0));
        // equal is not a break
        assert!(!extremes.breaks_above(3, 110.0));
        // no history
        assert!(!extremes.breaks_below(1, 0.1));
    }
}
