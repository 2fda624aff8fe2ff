//! In-memory containers handed to the validators.
//!
//! Loaders (not part of this crate) build these; validators only read them.

mod array;
mod matrix;
mod metadata;
mod table;
mod value;

pub use array::{DType, NumericData};
pub use matrix::LabeledMatrix;
pub use metadata::{Column, MetadataFrame};
pub use table::{AbundanceContainer, Axis, AxisMetadata, BiomTable};
pub use value::{labels, Value};

pub(crate) use value::ValueKey;

/// Any candidate object, for dispatch by data kind at runtime.
#[derive(Debug, Clone)]
pub enum DataObject {
    Table(BiomTable),
    Matrix(LabeledMatrix),
    Frame(MetadataFrame),
    Labels(Vec<Value>),
    /// Record-shaped input such as node, link, or network metadata.
    Json(serde_json::Value),
}

impl DataObject {
    /// Short description of what this object is, for `WrongType` messages.
    pub fn describe(&self) -> &'static str {
        match self {
            DataObject::Table(_) => "abundance table",
            DataObject::Matrix(_) => "labeled matrix",
            DataObject::Frame(_) => "metadata frame",
            DataObject::Labels(_) => "label list",
            DataObject::Json(_) => "JSON document",
        }
    }
}

impl From<BiomTable> for DataObject {
    fn from(t: BiomTable) -> Self {
        DataObject::Table(t)
    }
}

impl From<LabeledMatrix> for DataObject {
    fn from(m: LabeledMatrix) -> Self {
        DataObject::Matrix(m)
    }
}

impl From<MetadataFrame> for DataObject {
    fn from(f: MetadataFrame) -> Self {
        DataObject::Frame(f)
    }
}

impl From<Vec<Value>> for DataObject {
    fn from(v: Vec<Value>) -> Self {
        DataObject::Labels(v)
    }
}

impl From<serde_json::Value> for DataObject {
    fn from(v: serde_json::Value) -> Self {
        DataObject::Json(v)
    }
}
