//! Rolling window aggregates over an ordered series
//!
//! Shared primitive for every detector. A window that is not fully inside the
//! series, or that contains an undefined value, aggregates to `None`
//! (equivalent to `min_periods = window`).
//!
//! - `Trailing`: the window at index `i` covers `[i - w + 1, i]`
//! - `Centered`: the window covers `[i - w/2, i + (w - 1)/2]`, i.e. symmetric
//!   for odd `w` and one extra bar behind for even `w`
//! - `shift(k)`: index `i` reports the aggregate computed at `i - k`

use crate::domain::config::WindowAlignment;
use statrs::statistics::{Data, Distribution};
use std::ops::Range;

/// Element of a series that may be undefined
pub trait WindowValue: Copy {
    fn value(self) -> Option<f64>;
}

impl WindowValue for f64 {
    fn value(self) -> Option<f64> {
        if self.is_nan() { None } else { Some(self) }
    }
}

impl WindowValue for Option<f64> {
    fn value(self) -> Option<f64> {
        self.and_then(WindowValue::value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Max,
    Min,
    Mean,
    /// Sample standard deviation (n - 1 denominator).
    Std,
}

impl Aggregate {
    fn apply(self, values: Vec<f64>) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let result = match self {
            Aggregate::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregate::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregate::Mean => Data::new(values).mean()?,
            Aggregate::Std => Data::new(values).std_dev()?,
        };
        // statrs reports NaN for the std of a single value
        if result.is_nan() { None } else { Some(result) }
    }
}

/// Lazy rolling aggregate evaluator
///
/// # Example
///
/// ```
/// use smc_features::application::market_data::rolling_window::RollingWindow;
///
/// let highs = [1.0, 3.0, 2.0, 5.0];
/// // Highest high of the two bars before each bar
/// let prior: Vec<Option<f64>> = RollingWindow::trailing(&highs, 2).shift(1).max().collect();
/// assert_eq!(prior, vec![None, None, Some(3.0), Some(3.0)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RollingWindow<'a, T> {
    values: &'a [T],
    window: usize,
    alignment: WindowAlignment,
    shift: usize,
}

impl<'a, T: WindowValue> RollingWindow<'a, T> {
    pub fn new(values: &'a [T], window: usize, alignment: WindowAlignment) -> Self {
        Self {
            values,
            window,
            alignment,
            shift: 0,
        }
    }

    pub fn trailing(values: &'a [T], window: usize) -> Self {
        Self::new(values, window, WindowAlignment::Trailing)
    }

    pub fn centered(values: &'a [T], window: usize) -> Self {
        Self::new(values, window, WindowAlignment::Centered)
    }

    /// Re-aligns the output so index `i` reports the window computed at `i - k`.
    pub fn shift(mut self, k: usize) -> Self {
        self.shift = k;
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Source index range aggregated for output `index`, if the window fits.
    pub fn bounds(&self, index: usize) -> Option<Range<usize>> {
        if self.window == 0 || index >= self.values.len() {
            return None;
        }
        let anchor = index.checked_sub(self.shift)?;
        let (start, end) = match self.alignment {
            WindowAlignment::Trailing => ((anchor + 1).checked_sub(self.window)?, anchor + 1),
            WindowAlignment::Centered => {
                let behind = self.window / 2;
                let ahead = (self.window - 1) / 2;
                (anchor.checked_sub(behind)?, anchor + ahead + 1)
            }
        };
        if end > self.values.len() {
            return None;
        }
        Some(start..end)
    }

    fn aggregate_at(&self, index: usize, aggregate: Aggregate) -> Option<f64> {
        let range = self.bounds(index)?;
        let window: Option<Vec<f64>> = self.values[range].iter().map(|v| v.value()).collect();
        aggregate.apply(window?)
    }

    /// Lazily yields one aggregate per input element.
    pub fn aggregate(self, aggregate: Aggregate) -> impl Iterator<Item = Option<f64>> + 'a {
        (0..self.values.len()).map(move |i| self.aggregate_at(i, aggregate))
    }

    pub fn max(self) -> impl Iterator<Item = Option<f64>> + 'a {
        self.aggregate(Aggregate::Max)
    }

    pub fn min(self) -> impl Iterator<Item = Option<f64>> + 'a {
        self.aggregate(Aggregate::Min)
    }

    pub fn mean(self) -> impl Iterator<Item = Option<f64>> + 'a {
        self.aggregate(Aggregate::Mean)
    }

    pub fn std(self) -> impl Iterator<Item = Option<f64>> + 'a {
        self.aggregate(Aggregate::Std)
    }
}
