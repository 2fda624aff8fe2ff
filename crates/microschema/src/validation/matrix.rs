//! Square pairwise matrices: interactions, correlations, p-values.

use std::ops::ControlFlow;

use crate::error::ValidationError;
use crate::frame::{LabeledMatrix, NumericData};

use super::validator::{Sink, Tolerance, Validator};

/// Closed numeric interval every cell must fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const CORRELATION: Bounds = Bounds { min: -1.0, max: 1.0 };
    pub const PVALUE: Bounds = Bounds { min: 0.0, max: 1.0 };

    /// Largest or smallest offending cell, if any.
    fn violation(&self, data: &NumericData) -> Option<f64> {
        let (lo, hi) = data.min_max()?;
        if hi > self.max {
            Some(hi)
        } else if lo < self.min {
            Some(lo)
        } else {
            None
        }
    }
}

/// Structure of a square labeled matrix.
///
/// Rows and columns must carry the same labels in the same order and the
/// cells must be integer or floating point. With `symmetric` set the matrix
/// must also equal its transpose within tolerance.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionMatrixValidator {
    symmetric: bool,
    tolerance: Tolerance,
    target: Target,
}

/// Which matrix kind is reported in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Target {
    #[default]
    Interaction,
    Correlation,
    Pvalue,
}

impl Target {
    fn label(&self) -> &'static str {
        match self {
            Target::Interaction => "interaction matrix",
            Target::Correlation => "correlation matrix",
            Target::Pvalue => "pvalue matrix",
        }
    }
}

impl InteractionMatrixValidator {
    pub fn new(symmetric: bool) -> Self {
        Self {
            symmetric,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn symmetric(&self) -> bool {
        self.symmetric
    }

    fn target(&self) -> &'static str {
        self.target.label()
    }

    /// Returns false when later rules cannot run on this matrix.
    fn check_structure(&self, matrix: &LabeledMatrix, sink: &mut Sink) -> ControlFlow<(), bool> {
        let target = self.target();
        let (rows, cols) = matrix.data().shape();
        if rows != matrix.rows().len() || cols != matrix.columns().len() {
            sink.report(ValidationError::WrongType {
                target,
                expected: format!(
                    "a {}x{} labeled table",
                    matrix.rows().len(),
                    matrix.columns().len()
                ),
                found: format!("a {rows}x{cols} payload"),
            })?;
            return ControlFlow::Continue(false);
        }

        if matrix.rows().len() != matrix.columns().len() {
            sink.report(ValidationError::ShapeMismatch {
                target,
                rows: matrix.rows().len(),
                columns: matrix.columns().len(),
            })?;
            return ControlFlow::Continue(false);
        }

        if let Some((position, (row, column))) = matrix
            .rows()
            .iter()
            .zip(matrix.columns())
            .enumerate()
            .find(|(_, (r, c))| r != c)
        {
            sink.report(ValidationError::LabelMismatch {
                target,
                position,
                row: row.to_string(),
                column: column.to_string(),
            })?;
        }
        ControlFlow::Continue(true)
    }

    fn check_symmetry(&self, matrix: &LabeledMatrix, sink: &mut Sink) -> ControlFlow<()> {
        if !self.symmetric {
            return ControlFlow::Continue(());
        }
        // Non-numeric payloads are left to the dtype rule.
        let Some(values) = matrix.data().to_f64() else {
            return ControlFlow::Continue(());
        };
        let n = values.nrows();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (values[[i, j]], values[[j, i]]);
                if !self.tolerance.is_close(a, b) || !self.tolerance.is_close(b, a) {
                    return sink.report(ValidationError::NotSymmetric {
                        target: self.target(),
                        row: matrix.rows()[i].to_string(),
                        column: matrix.columns()[j].to_string(),
                    });
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn check_dtype(&self, matrix: &LabeledMatrix, sink: &mut Sink) -> ControlFlow<()> {
        let dtype = matrix.data().dtype();
        if !dtype.is_numeric() {
            sink.report(ValidationError::WrongNumericType {
                target: self.target(),
                expected: "int or float",
                found: dtype,
            })?;
        }
        ControlFlow::Continue(())
    }

    fn check_bounds(
        &self,
        matrix: &LabeledMatrix,
        bounds: Bounds,
        sink: &mut Sink,
    ) -> ControlFlow<()> {
        if let Some(value) = bounds.violation(matrix.data()) {
            sink.report(ValidationError::OutOfRangeValue {
                target: self.target(),
                field: "value".to_string(),
                value: value.to_string(),
                expected: format!("bound by {} and {}", bounds.min, bounds.max),
            })?;
        }
        ControlFlow::Continue(())
    }

    /// Full rule list, with an optional range rule last.
    fn check_with_bounds(
        &self,
        matrix: &LabeledMatrix,
        bounds: Option<Bounds>,
        sink: &mut Sink,
    ) -> ControlFlow<()> {
        if !self.check_structure(matrix, sink)? {
            return ControlFlow::Continue(());
        }
        self.check_symmetry(matrix, sink)?;
        self.check_dtype(matrix, sink)?;
        match bounds {
            Some(bounds) => self.check_bounds(matrix, bounds, sink),
            None => ControlFlow::Continue(()),
        }
    }
}

impl Validator<LabeledMatrix> for InteractionMatrixValidator {
    fn name(&self) -> &'static str {
        "interaction_matrix"
    }

    fn check(&self, value: &LabeledMatrix, sink: &mut Sink) -> ControlFlow<()> {
        self.check_with_bounds(value, None, sink)
    }
}

/// Symmetric matrix with every value in `[-1, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationMatrixValidator {
    base: InteractionMatrixValidator,
}

impl CorrelationMatrixValidator {
    pub fn new() -> Self {
        Self {
            base: InteractionMatrixValidator {
                symmetric: true,
                target: Target::Correlation,
                ..InteractionMatrixValidator::default()
            },
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.base = self.base.with_tolerance(tolerance);
        self
    }
}

impl Default for CorrelationMatrixValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator<LabeledMatrix> for CorrelationMatrixValidator {
    fn name(&self) -> &'static str {
        "correlation_matrix"
    }

    fn check(&self, value: &LabeledMatrix, sink: &mut Sink) -> ControlFlow<()> {
        self.base
            .check_with_bounds(value, Some(Bounds::CORRELATION), sink)
    }
}

/// Matrix with every value in `[0, 1]`; symmetry is not assumed.
#[derive(Debug, Clone, Copy)]
pub struct PvalueMatrixValidator {
    base: InteractionMatrixValidator,
}

impl PvalueMatrixValidator {
    pub fn new() -> Self {
        Self {
            base: InteractionMatrixValidator {
                symmetric: false,
                target: Target::Pvalue,
                ..InteractionMatrixValidator::default()
            },
        }
    }
}

impl Default for PvalueMatrixValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator<LabeledMatrix> for PvalueMatrixValidator {
    fn name(&self) -> &'static str {
        "pvalue_matrix"
    }

    fn check(&self, value: &LabeledMatrix, sink: &mut Sink) -> ControlFlow<()> {
        self.base.check_with_bounds(value, Some(Bounds::PVALUE), sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::frame::labels;
    use ndarray::array;

    fn abc() -> Vec<crate::frame::Value> {
        labels(["a", "b", "c"])
    }

    #[test]
    fn test_square_matrix_passes() {
        let m = LabeledMatrix::square(array![[1, 2, 3], [4, 5, 6], [7, 8, 9]], abc());
        assert!(InteractionMatrixValidator::new(false).validate(&m).is_ok());
    }

    #[test]
    fn test_shape_mismatch() {
        let m = LabeledMatrix::new(array![[1.0, 2.0]], labels(["a"]), labels(["a", "b"]));
        let err = InteractionMatrixValidator::new(false).validate(&m).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ShapeMismatch {
                target: "interaction matrix",
                rows: 1,
                columns: 2,
            }
        );
    }

    #[test]
    fn test_payload_not_matching_labels_is_wrong_type() {
        let m = LabeledMatrix::square(array![[1.0, 2.0], [3.0, 4.0]], abc());
        assert_eq!(
            InteractionMatrixValidator::new(false).validate(&m).unwrap_err().kind(),
            ErrorKind::WrongType
        );
    }

    #[test]
    fn test_label_order_mismatch() {
        let data = array![[1.0, 0.2], [0.2, 1.0]];
        let m = LabeledMatrix::new(data, labels(["a", "b"]), labels(["b", "a"]));
        let err = InteractionMatrixValidator::new(false).validate(&m).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LabelMismatch);
        assert!(err.to_string().contains("position 0"));
    }

    #[test]
    fn test_symmetry_only_when_requested() {
        let m = LabeledMatrix::square(array![[1.0, 0.3], [0.2, 1.0]], labels(["a", "b"]));
        assert!(InteractionMatrixValidator::new(false).validate(&m).is_ok());
        let err = InteractionMatrixValidator::new(true).validate(&m).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSymmetric);
    }

    #[test]
    fn test_dtype_must_be_numeric() {
        let m = LabeledMatrix::square(array![[true, false], [false, true]], labels(["a", "b"]));
        let err = InteractionMatrixValidator::new(true).validate(&m).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongNumericType);
    }

    #[test]
    fn test_correlation_bounds() {
        let m = LabeledMatrix::square(array![[1.0, 1.5], [1.5, 1.0]], labels(["a", "b"]));
        let err = CorrelationMatrixValidator::new().validate(&m).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRangeValue);
        assert!(err.to_string().contains("correlation matrix"));

        let ok = LabeledMatrix::square(array![[1.0, -0.4], [-0.4, 1.0]], labels(["a", "b"]));
        assert!(CorrelationMatrixValidator::new().validate(&ok).is_ok());
    }

    #[test]
    fn test_correlation_requires_symmetry() {
        let m = LabeledMatrix::square(array![[1.0, 0.5], [-0.5, 1.0]], labels(["a", "b"]));
        assert_eq!(
            CorrelationMatrixValidator::new().validate(&m).unwrap_err().kind(),
            ErrorKind::NotSymmetric
        );
    }

    #[test]
    fn test_pvalue_bounds_without_symmetry() {
        let asym = LabeledMatrix::square(array![[0.0, 0.01], [0.5, 0.0]], labels(["a", "b"]));
        assert!(PvalueMatrixValidator::new().validate(&asym).is_ok());

        let neg = LabeledMatrix::square(array![[0.0, -0.1], [0.5, 0.0]], labels(["a", "b"]));
        let err = PvalueMatrixValidator::new().validate(&neg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRangeValue);
        assert!(err.to_string().contains("-0.1"));
    }

    #[test]
    fn test_collect_all_skips_rules_after_shape_failure() {
        let m = LabeledMatrix::new(array![[5.0, 2.0]], labels(["a"]), labels(["a", "b"]));
        let all = CorrelationMatrixValidator::new().validate_all(&m).unwrap_err();
        assert_eq!(all.kinds(), vec![ErrorKind::ShapeMismatch]);
    }
}
