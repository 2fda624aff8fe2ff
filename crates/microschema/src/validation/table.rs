//! Whole-table validation for abundance tables.

use std::ops::ControlFlow;

use crate::error::ValidationError;
use crate::frame::{AbundanceContainer, Axis};

use super::primitives::{DataValidator, HeaderValidator, IndexValidator, SampleMetadataValidator};
use super::taxonomy::ObservationMetadataValidator;
use super::validator::{Sink, Tolerance, Validator};

/// Checks every facet of an abundance table.
///
/// Delegation order is fixed: container shape, sample ids, observation ids,
/// payload, sample metadata, observation metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableValidator {
    header: HeaderValidator,
    index: IndexValidator,
    data: DataValidator,
    sample_metadata: SampleMetadataValidator,
    observation_metadata: ObservationMetadataValidator,
}

impl TableValidator {
    pub fn new(normalized: bool) -> Self {
        Self {
            data: DataValidator::new(normalized),
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.data = self.data.with_tolerance(tolerance);
        self
    }

    pub fn normalized(&self) -> bool {
        self.data.normalized()
    }

    /// The payload must be observations × samples, and attached metadata
    /// must hold one record per id.
    fn check_container<T: AbundanceContainer + ?Sized>(
        &self,
        table: &T,
        sink: &mut Sink,
    ) -> ControlFlow<(), bool> {
        let expected = (table.ids(Axis::Observation).len(), table.ids(Axis::Sample).len());
        let found = table.data().shape();
        if expected != found {
            sink.report(ValidationError::WrongType {
                target: "table",
                expected: format!(
                    "a payload of {} observations by {} samples",
                    expected.0, expected.1
                ),
                found: format!("{}x{}", found.0, found.1),
            })?;
            return ControlFlow::Continue(false);
        }

        let mut aligned = true;
        for axis in [Axis::Sample, Axis::Observation] {
            let records = table.metadata_len(axis);
            let ids = table.ids(axis).len();
            if records != 0 && records != ids {
                sink.report(ValidationError::WrongType {
                    target: "table",
                    expected: format!("one {axis} metadata record per {axis} id ({ids})"),
                    found: format!("{records} records"),
                })?;
                aligned = false;
            }
        }
        ControlFlow::Continue(aligned)
    }
}

impl<T: AbundanceContainer + ?Sized> Validator<T> for TableValidator {
    fn name(&self) -> &'static str {
        "table"
    }

    fn check(&self, value: &T, sink: &mut Sink) -> ControlFlow<()> {
        log::debug!(
            "validating abundance table ({} observations, {} samples, normalized={})",
            value.ids(Axis::Observation).len(),
            value.ids(Axis::Sample).len(),
            self.normalized()
        );

        if !self.check_container(value, sink)? {
            return ControlFlow::Continue(());
        }
        self.header.check(value.ids(Axis::Sample), sink)?;
        self.index.check(value.ids(Axis::Observation), sink)?;
        Validator::<T>::check(&self.data, value, sink)?;

        let samples = value.metadata_frame(Axis::Sample);
        self.sample_metadata.check(&samples, sink)?;

        let observations = value.metadata_frame(Axis::Observation);
        self.observation_metadata.check(&observations, sink)
    }
}
