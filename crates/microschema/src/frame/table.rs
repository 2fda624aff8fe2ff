//! Abundance tables: observations × samples with per-axis metadata.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::array::NumericData;
use super::metadata::MetadataFrame;
use super::value::Value;

/// One of the two axes of an abundance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Columns of the payload.
    Sample,
    /// Rows of the payload.
    Observation,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Sample => f.write_str("sample"),
            Axis::Observation => f.write_str("observation"),
        }
    }
}

/// What the table validators need from a table container.
///
/// Loaders can implement this over their own storage; [`BiomTable`] is the
/// in-memory implementation.
pub trait AbundanceContainer {
    /// Ordered identifiers along `axis`.
    fn ids(&self, axis: Axis) -> &[Value];

    /// The observations × samples payload.
    fn data(&self) -> &NumericData;

    /// Number of metadata records attached along `axis`; zero when none are.
    fn metadata_len(&self, axis: Axis) -> usize;

    /// Metadata along `axis` flattened to a keyed record set.
    ///
    /// Columns appear in the order their keys are first seen across records.
    /// The taxonomy hierarchy rule reads that order, so loaders must insert
    /// rank keys from `Kingdom` downwards.
    fn metadata_frame(&self, axis: Axis) -> MetadataFrame;
}

/// Per-id metadata record.
pub type AxisMetadata = IndexMap<String, Value>;

/// In-memory abundance table.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomTable {
    observation_ids: Vec<Value>,
    sample_ids: Vec<Value>,
    data: NumericData,
    observation_metadata: Vec<AxisMetadata>,
    sample_metadata: Vec<AxisMetadata>,
}

impl BiomTable {
    /// Create a table without metadata.
    pub fn new(
        data: impl Into<NumericData>,
        observation_ids: Vec<Value>,
        sample_ids: Vec<Value>,
    ) -> Self {
        Self {
            observation_ids,
            sample_ids,
            data: data.into(),
            observation_metadata: Vec::new(),
            sample_metadata: Vec::new(),
        }
    }

    /// Attach one metadata record per observation.
    pub fn with_observation_metadata(mut self, records: Vec<AxisMetadata>) -> Self {
        self.observation_metadata = records;
        self
    }

    /// Attach one metadata record per sample.
    pub fn with_sample_metadata(mut self, records: Vec<AxisMetadata>) -> Self {
        self.sample_metadata = records;
        self
    }

    /// Number of (observations, samples).
    pub fn shape(&self) -> (usize, usize) {
        (self.observation_ids.len(), self.sample_ids.len())
    }
}

impl AbundanceContainer for BiomTable {
    fn ids(&self, axis: Axis) -> &[Value] {
        match axis {
            Axis::Sample => &self.sample_ids,
            Axis::Observation => &self.observation_ids,
        }
    }

    fn data(&self) -> &NumericData {
        &self.data
    }

    fn metadata_len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Sample => self.sample_metadata.len(),
            Axis::Observation => self.observation_metadata.len(),
        }
    }

    fn metadata_frame(&self, axis: Axis) -> MetadataFrame {
        let (ids, records) = match axis {
            Axis::Sample => (&self.sample_ids, &self.sample_metadata),
            Axis::Observation => (&self.observation_ids, &self.observation_metadata),
        };
        MetadataFrame::from_records(ids.clone(), records)
    }
}
