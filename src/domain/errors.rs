use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while validating a price series or building a feature table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Insufficient data: need at least {required} bars, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid bar at index {index} ({timestamp}): {reason}")]
    InvalidBar {
        index: usize,
        timestamp: DateTime<Utc>,
        reason: String,
    },

    #[error("Duplicate feature column: {name}")]
    DuplicateColumn { name: String },

    #[error("Column {name} has {actual} values, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid feature configuration: {reason}")]
    InvalidConfig { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_insufficient_data_formatting() {
        let error = FeatureError::InsufficientData {
            required: 21,
            available: 5,
        };

        let msg = error.to_string();
        assert!(msg.contains("21"));
        assert!(msg.contains("5"));
    }

    #[test]
    fn test_invalid_bar_formatting() {
        let error = FeatureError::InvalidBar {
            index: 3,
            timestamp: Utc.timestamp_opt(0, 0).unwrap(),
            reason: "high 99 < low 100".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("index 3"));
        assert!(msg.contains("high 99 < low 100"));
    }
}
