//! Single-concern validators over labels, payloads, and sample metadata.

use std::collections::HashMap;
use std::ops::ControlFlow;

use crate::error::ValidationError;
use crate::frame::{AbundanceContainer, Axis, DType, MetadataFrame, NumericData, Value, ValueKey};

use super::validator::{Sink, Tolerance, Validator};

/// First value (in order) that occurs more than once, with its count.
pub(crate) fn first_duplicate(values: &[Value]) -> Option<(&Value, usize)> {
    let mut counts: HashMap<ValueKey<'_>, usize> = HashMap::with_capacity(values.len());
    for value in values {
        *counts.entry(value.key()).or_default() += 1;
    }
    values.iter().find_map(|v| {
        let count = counts.get(&v.key()).copied().unwrap_or(0);
        (count > 1).then_some((v, count))
    })
}

/// Every column must have one cell per index entry.
pub(crate) fn check_frame_alignment(
    target: &'static str,
    frame: &MetadataFrame,
    sink: &mut Sink,
) -> ControlFlow<()> {
    if let Some((name, len)) = frame.misaligned_column() {
        sink.report(ValidationError::WrongType {
            target,
            expected: format!("{} cells in column {name}", frame.row_count()),
            found: len.to_string(),
        })?;
    }
    ControlFlow::Continue(())
}

/// Sample identifiers must all be strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderValidator;

impl Validator<[Value]> for HeaderValidator {
    fn name(&self) -> &'static str {
        "header"
    }

    fn check(&self, value: &[Value], sink: &mut Sink) -> ControlFlow<()> {
        if let Some(bad) = value.iter().find(|v| !v.is_str()) {
            sink.report(ValidationError::NonStringElement {
                target: "header",
                what: "samples",
                value: bad.to_string(),
            })?;
        }
        ControlFlow::Continue(())
    }
}

/// Observation identifiers must be unique strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexValidator;

impl Validator<[Value]> for IndexValidator {
    fn name(&self) -> &'static str {
        "index"
    }

    fn check(&self, value: &[Value], sink: &mut Sink) -> ControlFlow<()> {
        if let Some(bad) = value.iter().find(|v| !v.is_str()) {
            sink.report(ValidationError::NonStringElement {
                target: "index",
                what: "indices",
                value: bad.to_string(),
            })?;
        }
        if let Some((dup, count)) = first_duplicate(value) {
            sink.report(ValidationError::DuplicateIdentifier {
                target: "index",
                value: dup.to_string(),
                count,
            })?;
        }
        ControlFlow::Continue(())
    }
}

/// Abundance payload checks.
///
/// Values must be `float64` and non-negative. When `normalized` is set every
/// value must also lie in `[0, 1]` and each sample column must sum to 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataValidator {
    normalized: bool,
    tolerance: Tolerance,
}

impl DataValidator {
    pub fn new(normalized: bool) -> Self {
        Self {
            normalized,
            tolerance: Tolerance::default(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn normalized(&self) -> bool {
        self.normalized
    }

    fn check_payload(
        &self,
        data: &NumericData,
        samples: Option<&[Value]>,
        sink: &mut Sink,
    ) -> ControlFlow<()> {
        if data.dtype() != DType::Float64 {
            sink.report(ValidationError::WrongNumericType {
                target: "data",
                expected: "float64",
                found: data.dtype(),
            })?;
        }

        // Range rules need a numeric view; with bool or string cells there is nothing more to say.
        let Some((min, max)) = data.min_max() else {
            return self.check_sums(data, samples, sink);
        };

        if min < 0.0 {
            sink.report(ValidationError::NegativeValue {
                target: "data",
                value: min,
            })?;
        }

        if self.normalized && (max > 1.0 || min < 0.0) {
            let value = if max > 1.0 { max } else { min };
            sink.report(ValidationError::OutOfRangeValue {
                target: "data",
                field: "abundance".to_string(),
                value: value.to_string(),
                expected: "within [0, 1] when normalized".to_string(),
            })?;
        }

        self.check_sums(data, samples, sink)
    }

    fn check_sums(
        &self,
        data: &NumericData,
        samples: Option<&[Value]>,
        sink: &mut Sink,
    ) -> ControlFlow<()> {
        if !self.normalized {
            return ControlFlow::Continue(());
        }
        let Some(sums) = data.column_sums() else {
            return ControlFlow::Continue(());
        };

        if let Some((col, sum)) = sums
            .iter()
            .enumerate()
            .find(|(_, sum)| !self.tolerance.is_close(**sum, 1.0))
        {
            let column = samples
                .and_then(|s| s.get(col))
                .map(Value::to_string)
                .unwrap_or_else(|| format!("#{col}"));
            sink.report(ValidationError::NotNormalized {
                target: "data",
                column,
                sum: *sum,
            })?;
        }
        ControlFlow::Continue(())
    }
}

impl Validator<NumericData> for DataValidator {
    fn name(&self) -> &'static str {
        "data"
    }

    fn check(&self, value: &NumericData, sink: &mut Sink) -> ControlFlow<()> {
        self.check_payload(value, None, sink)
    }
}

impl<T: AbundanceContainer + ?Sized> Validator<T> for DataValidator {
    fn name(&self) -> &'static str {
        "data"
    }

    fn check(&self, value: &T, sink: &mut Sink) -> ControlFlow<()> {
        self.check_payload(value.data(), Some(value.ids(Axis::Sample)), sink)
    }
}

/// Structure of the per-sample metadata frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleMetadataValidator;

impl Validator<MetadataFrame> for SampleMetadataValidator {
    fn name(&self) -> &'static str {
        "sample_metadata"
    }

    fn check(&self, value: &MetadataFrame, sink: &mut Sink) -> ControlFlow<()> {
        const TARGET: &str = "sample metadata";

        check_frame_alignment(TARGET, value, sink)?;

        if value.column_count() < 1 {
            sink.report(ValidationError::EmptyColumnSet { target: TARGET })?;
        }

        if let Some((dup, count)) = first_duplicate(value.index()) {
            sink.report(ValidationError::DuplicateIdentifier {
                target: TARGET,
                value: dup.to_string(),
                count,
            })?;
        }

        for id in value.index() {
            match id.as_str() {
                None => {
                    sink.report(ValidationError::MalformedHeaderRow {
                        target: TARGET,
                        value: format!("{} index value {}", id.type_name(), id),
                    })?;
                    break;
                }
                Some(s) if s.starts_with('#') => {
                    sink.report(ValidationError::MalformedHeaderRow {
                        target: TARGET,
                        value: s.to_string(),
                    })?;
                    break;
                }
                Some(_) => {}
            }
        }
        ControlFlow::Continue(())
    }
}
