//! Labeled square tables of pairwise values.

use super::array::NumericData;
use super::value::Value;

/// A 2-D payload with row and column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    rows: Vec<Value>,
    columns: Vec<Value>,
    data: NumericData,
}

impl LabeledMatrix {
    pub fn new(data: impl Into<NumericData>, rows: Vec<Value>, columns: Vec<Value>) -> Self {
        Self {
            rows,
            columns,
            data: data.into(),
        }
    }

    /// Same labels on both axes.
    pub fn square(data: impl Into<NumericData>, labels: Vec<Value>) -> Self {
        Self::new(data, labels.clone(), labels)
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn columns(&self) -> &[Value] {
        &self.columns
    }

    pub fn data(&self) -> &NumericData {
        &self.data
    }

    /// Swap the axes together with their labels.
    pub fn transpose(&self) -> LabeledMatrix {
        LabeledMatrix {
            rows: self.columns.clone(),
            columns: self.rows.clone(),
            data: self.data.transpose(),
        }
    }
}
