use serde::{Deserialize, Serialize};

/// Values of one derived column, one entry per bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValues {
    /// Boolean detector output. Always defined.
    Flag(Vec<bool>),
    /// Numeric output. `None` marks a bar without enough history.
    Numeric(Vec<Option<f64>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Flag(v) => v.len(),
            ColumnValues::Numeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_defined(&self, row: usize) -> bool {
        match self {
            ColumnValues::Flag(v) => row < v.len(),
            ColumnValues::Numeric(v) => matches!(v.get(row), Some(Some(_))),
        }
    }

    /// Keeps only the rows whose index is listed in `rows` (ascending).
    pub(crate) fn select(&self, rows: &[usize]) -> ColumnValues {
        match self {
            ColumnValues::Flag(v) => ColumnValues::Flag(rows.iter().map(|&r| v[r]).collect()),
            ColumnValues::Numeric(v) => {
                ColumnValues::Numeric(rows.iter().map(|&r| v[r]).collect())
            }
        }
    }
}

/// A named derived column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name: String,
    pub values: ColumnValues,
}

impl FeatureColumn {
    pub fn flag(name: impl Into<String>, values: Vec<bool>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Flag(values),
        }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_flags(&self) -> Option<&[bool]> {
        match &self.values {
            ColumnValues::Flag(v) => Some(v),
            ColumnValues::Numeric(_) => None,
        }
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            ColumnValues::Flag(_) => None,
        }
    }
}
