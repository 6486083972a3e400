use super::column::{ColumnValues, FeatureColumn};
use crate::domain::errors::FeatureError;
use crate::domain::market::{Bar, PriceSeries};

/// Price series extended with named derived columns.
///
/// # Invariants
///
/// - every column has exactly one value per bar
/// - column names are unique
/// - OHLCV values are copied from the source series and never modified
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    bars: Vec<Bar>,
    columns: Vec<FeatureColumn>,
}

impl FeatureTable {
    /// Starts a table with no derived columns.
    pub fn from_series(series: &PriceSeries) -> Self {
        Self {
            bars: series.bars().to_vec(),
            columns: Vec::new(),
        }
    }

    /// Returns a new table with `column` appended.
    pub fn with_column(self, column: FeatureColumn) -> Result<Self, FeatureError> {
        self.with_columns(std::iter::once(column))
    }

    /// Returns a new table with all `columns` appended, in order.
    pub fn with_columns(
        mut self,
        columns: impl IntoIterator<Item = FeatureColumn>,
    ) -> Result<Self, FeatureError> {
        for column in columns {
            let actual = column.len();
            if actual != self.bars.len() {
                return Err(FeatureError::ColumnLength {
                    name: column.name,
                    expected: self.bars.len(),
                    actual,
                });
            }
            if self.column(&column.name).is_some() {
                return Err(FeatureError::DuplicateColumn { name: column.name });
            }
            self.columns.push(column);
        }
        Ok(self)
    }

    /// Returns a new table keeping only rows where every column is defined.
    pub fn drop_incomplete(&self) -> Self {
        let rows: Vec<usize> = (0..self.bars.len())
            .filter(|&row| self.is_complete(row))
            .collect();
        self.select_rows(&rows)
    }

    /// Returns a new table with the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        let rows: Vec<usize> = (0..n.min(self.bars.len())).collect();
        self.select_rows(&rows)
    }

    fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            bars: rows.iter().map(|&r| self.bars[r]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| FeatureColumn {
                    name: c.name.clone(),
                    values: c.values.select(rows),
                })
                .collect(),
        }
    }

    pub fn is_complete(&self, row: usize) -> bool {
        row < self.bars.len() && self.columns.iter().all(|c| c.values.is_defined(row))
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

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&FeatureColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Boolean value at `row`, `None` if the column is missing or numeric.
    pub fn flag(&self, name: &str, row: usize) -> Option<bool> {
        self.column(name)?.as_flags()?.get(row).copied()
    }

    /// Numeric value at `row`, `None` if missing, non-numeric or undefined.
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        match &self.column(name)?.values {
            ColumnValues::Numeric(v) => v.get(row).copied().flatten(),
            ColumnValues::Flag(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(n: usize) -> PriceSeries {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        PriceSeries::new(
            (0..n)
                .map(|i| {
                    let p = 100.0 + i as f64;
                    Bar::new(start + Duration::minutes(i as i64), p, p + 1.0, p - 1.0, p, 10.0)
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_drop_incomplete_rows() {
        let table = FeatureTable::from_series(&series(4))
            .with_column(FeatureColumn::numeric(
                "lagged",
                vec![None, Some(1.0), Some(2.0), Some(3.0)],
            ))
            .unwrap()
            .with_column(FeatureColumn::flag("flag", vec![true, false, true, false]))
            .unwrap();

        assert!(!table.is_complete(0));
        let dropped = table.drop_incomplete();
        assert_eq!(dropped.len(), 3);
        assert_eq!(dropped.bars()[0].open, 101.0);
        assert_eq!(dropped.value("lagged", 0), Some(1.0));
        assert_eq!(dropped.flag("flag", 0), Some(false));
        assert_eq!(dropped.flag("flag", 1), Some(true));
        // Source table is unchanged
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = FeatureTable::from_series(&series(2))
            .with_column(FeatureColumn::flag("x", vec![true, true]))
            .unwrap()
            .with_column(FeatureColumn::flag("x", vec![false, false]))
            .unwrap_err();
        assert_eq!(
            err,
            FeatureError::DuplicateColumn {
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn test_column_length_mismatch_rejected() {
        let err = FeatureTable::from_series(&series(3))
            .with_column(FeatureColumn::numeric("short", vec![Some(1.0)]))
            .unwrap_err();
        assert_eq!(
            err,
            FeatureError::ColumnLength {
                name: "short".to_string(),
                expected: 3,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_typed_accessors() {
        let table = FeatureTable::from_series(&series(2))
            .with_column(FeatureColumn::numeric("n", vec![Some(0.5), None]))
            .unwrap();
        assert_eq!(table.value("n", 0), Some(0.5));
        assert_eq!(table.value("n", 1), None);
        assert_eq!(table.flag("n", 0), None);
        assert_eq!(table.value("missing", 0), None);
        assert_eq!(table.column_names(), vec!["n"]);
    }

    #[test]
    fn test_head_keeps_leading_rows() {
        let table = FeatureTable::from_series(&series(3))
            .with_column(FeatureColumn::flag("f", vec![true, false, true]))
            .unwrap();
        let head = table.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head.bars(), &table.bars()[..2]);
        assert_eq!(head.flag("f", 1), Some(false));
        assert_eq!(table.head(10), table);
    }
}
