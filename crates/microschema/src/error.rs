//! Error types for microschema validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frame::DType;

/// A single violated rule.
///
/// `target` names the facet being validated ("header", "index", "data",
/// "sample metadata", "observation metadata", a matrix kind, or a record kind)
/// so that messages read the same regardless of which composite raised them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Object is not the expected container or shape.
    #[error("Invalid {target}. Expected {expected}, found {found}")]
    WrongType {
        target: &'static str,
        expected: String,
        found: String,
    },

    /// A label or list element that must be a string is not.
    #[error("Invalid {target}. All {what} must be strings, found {value}")]
    NonStringElement {
        target: &'static str,
        what: &'static str,
        value: String,
    },

    /// An identifier occurs more than once along its axis.
    #[error("Invalid {target}. All indices must be unique, '{value}' appears {count} times")]
    DuplicateIdentifier {
        target: &'static str,
        value: String,
        count: usize,
    },

    /// Numeric payload has the wrong element type.
    #[error("Invalid {target}. Values must be {expected}, found {found}")]
    WrongNumericType {
        target: &'static str,
        expected: &'static str,
        found: DType,
    },

    /// A value that must be non-negative is negative.
    #[error("Invalid {target}. Abundances cannot be negative, found {value}")]
    NegativeValue { target: &'static str, value: f64 },

    /// A normalized sample does not sum to one.
    #[error("Invalid {target}. Abundances are not normalized: sample '{column}' sums to {sum}")]
    NotNormalized {
        target: &'static str,
        column: String,
        sum: f64,
    },

    /// A table that needs at least one column has none.
    #[error("Invalid {target}. At least one column is required")]
    EmptyColumnSet { target: &'static str },

    /// Row index looks like a mis-parsed header line.
    #[error("Invalid {target} structure. Possibly incorrect header: {value}")]
    MalformedHeaderRow { target: &'static str, value: String },

    /// A column or field outside the fixed schema.
    #[error("Invalid {target}. Unknown attribute {field} present")]
    UnknownField { target: &'static str, field: String },

    /// Hierarchy columns do not form a contiguous, ordered prefix.
    #[error("Invalid {target}. Required attribute {expected} not present (found {found})")]
    HierarchyOutOfOrder {
        target: &'static str,
        expected: String,
        found: String,
    },

    /// A value outside its permitted bounds.
    #[error("Invalid {target}. {field} must be {expected}, found {value}")]
    OutOfRangeValue {
        target: &'static str,
        field: String,
        value: String,
        expected: String,
    },

    /// Row and column label counts differ.
    #[error("Invalid {target}. Must have same number of rows and columns, found {rows} rows and {columns} columns")]
    ShapeMismatch {
        target: &'static str,
        rows: usize,
        columns: usize,
    },

    /// Row and column labels differ at some position.
    #[error("Invalid {target}. Row and column headers should match, position {position} has row '{row}' and column '{column}'")]
    LabelMismatch {
        target: &'static str,
        position: usize,
        row: String,
        column: String,
    },

    /// Matrix differs from its transpose.
    #[error("Invalid {target}. Matrix is not symmetric at ('{row}', '{column}')")]
    NotSymmetric {
        target: &'static str,
        row: String,
        column: String,
    },

    /// A string does not match the required format.
    #[error("Invalid {target}. Names are not standard: '{value}' is not allowed in {field}")]
    InvalidNameFormat {
        target: &'static str,
        field: String,
        value: String,
    },

    /// A required field is absent.
    #[error("Invalid {target}. Required field {field} is missing")]
    RequiredFieldMissing { target: &'static str, field: String },
}

/// Discriminant of a [`ValidationError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    WrongType,
    NonStringElement,
    DuplicateIdentifier,
    WrongNumericType,
    NegativeValue,
    NotNormalized,
    EmptyColumnSet,
    MalformedHeaderRow,
    UnknownField,
    HierarchyOutOfOrder,
    OutOfRangeValue,
    ShapeMismatch,
    LabelMismatch,
    NotSymmetric,
    InvalidNameFormat,
    RequiredFieldMissing,
}

impl ErrorKind {
    /// Get a human-readable label for the error kind.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::WrongType => "Wrong Type",
            ErrorKind::NonStringElement => "Non-String Element",
            ErrorKind::DuplicateIdentifier => "Duplicate Identifier",
            ErrorKind::WrongNumericType => "Wrong Numeric Type",
            ErrorKind::NegativeValue => "Negative Value",
            ErrorKind::NotNormalized => "Not Normalized",
            ErrorKind::EmptyColumnSet => "Empty Column Set",
            ErrorKind::MalformedHeaderRow => "Malformed Header Row",
            ErrorKind::UnknownField => "Unknown Field",
            ErrorKind::HierarchyOutOfOrder => "Hierarchy Out Of Order",
            ErrorKind::OutOfRangeValue => "Out Of Range Value",
            ErrorKind::ShapeMismatch => "Shape Mismatch",
            ErrorKind::LabelMismatch => "Label Mismatch",
            ErrorKind::NotSymmetric => "Not Symmetric",
            ErrorKind::InvalidNameFormat => "Invalid Name Format",
            ErrorKind::RequiredFieldMissing => "Required Field Missing",
        }
    }
}

impl ValidationError {
    /// The kind of rule that was violated.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::WrongType { .. } => ErrorKind::WrongType,
            ValidationError::NonStringElement { .. } => ErrorKind::NonStringElement,
            ValidationError::DuplicateIdentifier { .. } => ErrorKind::DuplicateIdentifier,
            ValidationError::WrongNumericType { .. } => ErrorKind::WrongNumericType,
            ValidationError::NegativeValue { .. } => ErrorKind::NegativeValue,
            ValidationError::NotNormalized { .. } => ErrorKind::NotNormalized,
            ValidationError::EmptyColumnSet { .. } => ErrorKind::EmptyColumnSet,
            ValidationError::MalformedHeaderRow { .. } => ErrorKind::MalformedHeaderRow,
            ValidationError::UnknownField { .. } => ErrorKind::UnknownField,
            ValidationError::HierarchyOutOfOrder { .. } => ErrorKind::HierarchyOutOfOrder,
            ValidationError::OutOfRangeValue { .. } => ErrorKind::OutOfRangeValue,
            ValidationError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            ValidationError::LabelMismatch { .. } => ErrorKind::LabelMismatch,
            ValidationError::NotSymmetric { .. } => ErrorKind::NotSymmetric,
            ValidationError::InvalidNameFormat { .. } => ErrorKind::InvalidNameFormat,
            ValidationError::RequiredFieldMissing { .. } => ErrorKind::RequiredFieldMissing,
        }
    }

    /// The facet that was being validated.
    pub fn target(&self) -> &'static str {
        match self {
            ValidationError::WrongType { target, .. }
            | ValidationError::NonStringElement { target, .. }
            | ValidationError::DuplicateIdentifier { target, .. }
            | ValidationError::WrongNumericType { target, .. }
            | ValidationError::NegativeValue { target, .. }
            | ValidationError::NotNormalized { target, .. }
            | ValidationError::EmptyColumnSet { target }
            | ValidationError::MalformedHeaderRow { target, .. }
            | ValidationError::UnknownField { target, .. }
            | ValidationError::HierarchyOutOfOrder { target, .. }
            | ValidationError::OutOfRangeValue { target, .. }
            | ValidationError::ShapeMismatch { target, .. }
            | ValidationError::LabelMismatch { target, .. }
            | ValidationError::NotSymmetric { target, .. }
            | ValidationError::InvalidNameFormat { target, .. }
            | ValidationError::RequiredFieldMissing { target, .. } => *target,
        }
    }
}

/// Every violation found by a collect-all pass, in rule order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Violations {
    errors: Vec<ValidationError>,
}

impl Violations {
    /// Create an empty set of violations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// The first violation, which is also what a fail-fast pass reports.
    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when nothing was violated.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Kinds of all violations, in order.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.errors.iter().map(ValidationError::kind).collect()
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Consume into the underlying list.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> std::result::Result<(), Violations> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for Violations {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for Violations {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no violations"),
            [only] => write!(f, "{only}"),
            many => {
                writeln!(f, "{} violations:", many.len())?;
                for (i, error) in many.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Violations {}

/// Result type alias for fail-fast validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
