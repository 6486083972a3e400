use crate::domain::errors::FeatureError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV record for a fixed time interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Checks the OHLC ordering invariant `low <= min(open, close) <= max(open, close) <= high`
    /// along with positivity of prices and non-negative volume.
    ///
    /// Returns a human readable reason on the first violated rule.
    pub fn check(&self) -> Result<(), String> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(format!("{} is not a finite number ({})", name, value));
            }
        }

        for (name, value) in &fields[..4] {
            if *value <= 0.0 {
                return Err(format!("{} must be positive, got {}", name, value));
            }
        }
        if self.volume < 0.0 {
            return Err(format!("volume must be non-negative, got {}", self.volume));
        }

        if self.high < self.low {
            return Err(format!("high {} < low {}", self.high, self.low));
        }
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if self.low > body_low {
            return Err(format!("low {} above candle body {}", self.low, body_low));
        }
        if self.high < body_high {
            return Err(format!("high {} below candle body {}", self.high, body_high));
        }

        Ok(())
    }
}

/// Ordered, validated sequence of bars with strictly increasing timestamps.
///
/// Detectors only read the series; OHLCV values are never mutated after
/// construction. Columnar accessors return owned vectors so rolling windows
/// can run over contiguous slices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Validates and wraps the bars. Fails fast on the first offending bar.
    pub fn new(bars: Vec<Bar>) -> Result<Self, FeatureError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.check().map_err(|reason| FeatureError::InvalidBar {
                index,
                timestamp: bar.timestamp,
                reason,
            })?;

            if index > 0 {
                let prev = bars[index - 1].timestamp;
                if bar.timestamp <= prev {
                    return Err(FeatureError::InvalidBar {
                        index,
                        timestamp: bar.timestamp,
                        reason: format!(
                            "timestamp not strictly increasing (previous {})",
                            prev
                        ),
                    });
                }
            }
        }

        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ts(minute: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::minutes(minute)
    }

    #[test]
    fn test_valid_series_accessors() {
        let series = PriceSeries::new(vec![
            Bar::new(ts(0), 100.0, 105.0, 98.0, 102.0, 1000.0),
            Bar::new(ts(1), 102.0, 110.0, 101.0, 108.0, 1200.0),
        ])
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.highs(), vec![105.0, 110.0]);
        assert_eq!(series.lows(), vec![98.0, 101.0]);
        assert_eq!(series.volumes(), vec![1000.0, 1200.0]);
        assert_eq!(series.get(1).unwrap().close, 108.0);
    }

    #[test]
    fn test_high_below_low_rejected() {
        let err = PriceSeries::new(vec![Bar::new(ts(0), 100.0, 99.0, 101.0, 100.0, 10.0)])
            .unwrap_err();
        match err {
            FeatureError::InvalidBar { index, reason, .. } => {
                assert_eq!(index, 0);
                assert!(reason.contains("high"), "unexpected reason: {}", reason);
            }
            other => panic!("Expected InvalidBar, got {:?}", other),
        }
    }

    #[test]
    fn test_close_outside_range_rejected() {
        let err = PriceSeries::new(vec![Bar::new(ts(0), 100.0, 101.0, 99.0, 102.0, 10.0)])
            .unwrap_err();
        assert!(matches!(err, FeatureError::InvalidBar { index: 0, .. }));
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let err = PriceSeries::new(vec![
            Bar::new(ts(0), 100.0, 101.0, 99.0, 100.0, 10.0),
            Bar::new(ts(1), 100.0, 101.0, 99.0, 100.0, 10.0),
            Bar::new(ts(1), 100.0, 101.0, 99.0, 100.0, 10.0),
        ])
        .unwrap_err();
        assert!(matches!(err, FeatureError::InvalidBar { index: 2, .. }));
    }

    #[test]
    fn test_non_positive_price_and_negative_volume_rejected() {
        assert!(Bar::new(ts(0), 0.0, 1.0, 0.0, 0.5, 1.0).check().is_err());
        assert!(Bar::new(ts(0), 1.0, 1.0, 1.0, 1.0, -1.0).check().is_err());
        assert!(Bar::new(ts(0), f64::NAN, 1.0, 1.0, 1.0, 1.0).check().is_err());
        assert!(Bar::new(ts(0), 1.0, 1.0, 1.0, 1.0, 0.0).check().is_ok());
    }
}
