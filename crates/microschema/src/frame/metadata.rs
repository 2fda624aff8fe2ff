//! Keyed record sets: per-sample and per-observation metadata.

use indexmap::IndexMap;

use super::array::DType;
use super::value::Value;

/// A single typed metadata column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    /// Missing numeric cells are NaN.
    Float(Vec<f64>),
    Str(Vec<String>),
    Object(Vec<Value>),
}

impl Column {
    /// Build a column from loose cells, choosing the narrowest dtype that holds them.
    ///
    /// All strings give `Str`, all ints give `Int`, any mix of ints, floats and
    /// nulls with at least one number gives `Float` (nulls become NaN), all
    /// bools give `Bool`. Anything else stays `Object`.
    pub fn infer(values: Vec<Value>) -> Column {
        if !values.is_empty() && values.iter().all(Value::is_str) {
            return Column::Str(
                values
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Str(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            );
        }
        if !values.is_empty() && values.iter().all(|v| matches!(v, Value::Int(_))) {
            return Column::Int(
                values
                    .iter()
                    .filter_map(|v| match v {
                        Value::Int(i) => Some(*i),
                        _ => None,
                    })
                    .collect(),
            );
        }
        if !values.is_empty() && values.iter().all(|v| matches!(v, Value::Bool(_))) {
            return Column::Bool(
                values
                    .iter()
                    .filter_map(|v| match v {
                        Value::Bool(b) => Some(*b),
                        _ => None,
                    })
                    .collect(),
            );
        }
        let numeric_or_null = values
            .iter()
            .all(|v| matches!(v, Value::Int(_) | Value::Float(_) | Value::Null));
        let any_number = values.iter().any(|v| v.as_f64().is_some());
        if numeric_or_null && any_number {
            return Column::Float(
                values
                    .iter()
                    .map(|v| v.as_f64().unwrap_or(f64::NAN))
                    .collect(),
            );
        }
        Column::Object(values)
    }

    pub fn dtype(&self) -> DType {
        match self {
            Column::Bool(_) => DType::Bool,
            Column::Int(_) => DType::Int64,
            Column::Float(_) => DType::Float64,
            Column::Str(_) => DType::Str,
            Column::Object(_) => DType::Object,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Bool(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Str(v) => v.len(),
            Column::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `row` as a loose value.
    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            Column::Bool(v) => v.get(row).map(|b| Value::Bool(*b)),
            Column::Int(v) => v.get(row).map(|i| Value::Int(*i)),
            Column::Float(v) => v.get(row).map(|f| Value::Float(*f)),
            Column::Str(v) => v.get(row).map(|s| Value::Str(s.clone())),
            Column::Object(v) => v.get(row).cloned(),
        }
    }

    /// All cells as loose values.
    pub fn values(&self) -> Vec<Value> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }
}

impl From<Vec<&str>> for Column {
    fn from(v: Vec<&str>) -> Self {
        Column::Str(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Column {
    fn from(v: Vec<String>) -> Self {
        Column::Str(v)
    }
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Column::Float(v)
    }
}

impl From<Vec<i64>> for Column {
    fn from(v: Vec<i64>) -> Self {
        Column::Int(v)
    }
}

impl From<Vec<Value>> for Column {
    fn from(v: Vec<Value>) -> Self {
        Column::Object(v)
    }
}

/// Named columns over a shared row index, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataFrame {
    index: Vec<Value>,
    columns: IndexMap<String, Column>,
}

impl MetadataFrame {
    /// Create a frame with the given row index and no columns.
    pub fn new(index: Vec<Value>) -> Self {
        Self {
            index,
            columns: IndexMap::new(),
        }
    }

    /// Add or replace a column.
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        self.columns.insert(name.into(), column.into());
        self
    }

    /// Add or replace a column in place.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) {
        self.columns.insert(name.into(), column);
    }

    /// Build a frame from per-row records; missing keys become null.
    ///
    /// Column order follows first appearance across rows.
    pub fn from_records(index: Vec<Value>, records: &[IndexMap<String, Value>]) -> Self {
        let mut names: Vec<&String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !names.contains(&key) {
                    names.push(key);
                }
            }
        }

        let mut frame = Self::new(index);
        for name in names {
            let cells = records
                .iter()
                .map(|r| r.get(name).cloned().unwrap_or(Value::Null))
                .collect();
            frame.insert(name.clone(), Column::infer(cells));
        }
        frame
    }

    pub fn index(&self) -> &[Value] {
        &self.index
    }

    pub fn columns(&self) -> &IndexMap<String, Column> {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// First column whose length differs from the index, with that length.
    pub fn misaligned_column(&self) -> Option<(&str, usize)> {
        self.columns
            .iter()
            .find(|(_, column)| column.len() != self.index.len())
            .map(|(name, column)| (name.as_str(), column.len()))
    }
}
