//! Row values moving through the pipeline
//!
//! Values are opaque text: the pipeline never interprets or coerces them.
//! `None` stands for SQL NULL.

/// A single column value
pub type Value = Option<String>;

/// An ordered tuple of values aligned to the source projection list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    values: Vec<Value>,
}

impl RawRecord {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Builds a record from non-null text values
    pub fn from_text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(|v| Some(v.into())).collect(),
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A batch of rows ready for a multi-row insert
///
/// `columns` are target-side names; every row has exactly one value per column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StagingBatch {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl StagingBatch {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
