//! Typed two-dimensional payloads.

use std::fmt;

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Element type of a payload or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    Str,
    /// Mixed or untyped cells.
    Object,
}

impl DType {
    /// Returns true for integer types.
    pub fn is_integer(&self) -> bool {
        matches!(self, DType::Int32 | DType::Int64)
    }

    /// Returns true for floating-point types.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    /// Returns true for integer or floating-point types.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn name(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Str => "str",
            DType::Object => "object",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dense 2-D payload in one concrete element type.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericData {
    Bool(Array2<bool>),
    Int32(Array2<i32>),
    Int64(Array2<i64>),
    Float32(Array2<f32>),
    Float64(Array2<f64>),
    Str(Array2<String>),
}

impl NumericData {
    pub fn dtype(&self) -> DType {
        match self {
            NumericData::Bool(_) => DType::Bool,
            NumericData::Int32(_) => DType::Int32,
            NumericData::Int64(_) => DType::Int64,
            NumericData::Float32(_) => DType::Float32,
            NumericData::Float64(_) => DType::Float64,
            NumericData::Str(_) => DType::Str,
        }
    }

    /// (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        match self {
            NumericData::Bool(a) => a.dim(),
            NumericData::Int32(a) => a.dim(),
            NumericData::Int64(a) => a.dim(),
            NumericData::Float32(a) => a.dim(),
            NumericData::Float64(a) => a.dim(),
            NumericData::Str(a) => a.dim(),
        }
    }

    /// Returns true if the payload holds no cells.
    pub fn is_empty(&self) -> bool {
        let (rows, cols) = self.shape();
        rows == 0 || cols == 0
    }

    /// Widen a numeric payload to `f64`; `None` for bool and string payloads.
    pub fn to_f64(&self) -> Option<Array2<f64>> {
        match self {
            NumericData::Int32(a) => Some(a.mapv(f64::from)),
            NumericData::Int64(a) => Some(a.mapv(|v| v as f64)),
            NumericData::Float32(a) => Some(a.mapv(f64::from)),
            NumericData::Float64(a) => Some(a.clone()),
            NumericData::Bool(_) | NumericData::Str(_) => None,
        }
    }

    /// Minimum and maximum over all numeric cells, ignoring NaN.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let values = self.to_f64()?;
        values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Per-column sums of a numeric payload.
    pub fn column_sums(&self) -> Option<Vec<f64>> {
        let values = self.to_f64()?;
        Some(values.sum_axis(Axis(0)).to_vec())
    }

    /// Swap rows and columns.
    pub fn transpose(&self) -> NumericData {
        match self {
            NumericData::Bool(a) => NumericData::Bool(a.t().to_owned()),
            NumericData::Int32(a) => NumericData::Int32(a.t().to_owned()),
            NumericData::Int64(a) => NumericData::Int64(a.t().to_owned()),
            NumericData::Float32(a) => NumericData::Float32(a.t().to_owned()),
            NumericData::Float64(a) => NumericData::Float64(a.t().to_owned()),
            NumericData::Str(a) => NumericData::Str(a.t().to_owned()),
        }
    }
}

impl From<Array2<f64>> for NumericData {
    fn from(a: Array2<f64>) -> Self {
        NumericData::Float64(a)
    }
}

impl From<Array2<f32>> for NumericData {
    fn from(a: Array2<f32>) -> Self {
        NumericData::Float32(a)
    }
}

impl From<Array2<i64>> for NumericData {
    fn from(a: Array2<i64>) -> Self {
        NumericData::Int64(a)
    }
}

impl From<Array2<i32>> for NumericData {
    fn from(a: Array2<i32>) -> Self {
        NumericData::Int32(a)
    }
}

impl From<Array2<bool>> for NumericData {
    fn from(a: Array2<bool>) -> Self {
        NumericData::Bool(a)
    }
}

impl From<Array2<String>> for NumericData {
    fn from(a: Array2<String>) -> Self {
        NumericData::Str(a)
    }
}
