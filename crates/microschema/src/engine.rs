//! Entry points by data kind, with configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, Violations};
use crate::frame::{BiomTable, DataObject, LabeledMatrix};
use crate::models::{
    ChildrenMapValidator, LinkRecord, MetadataRecord, NetworkMetadataRecord, NodeRecord, Record,
};
use crate::validation::{
    CorrelationMatrixValidator, HeaderValidator, InteractionMatrixValidator, Mode,
    ObservationMetadataValidator, PvalueMatrixValidator, SampleMetadataValidator, TableValidator,
    Tolerance, Validator,
};

/// Kinds of data a pipeline step can declare for its inputs and outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    OtuTable,
    InteractionTable,
    CorrelationTable,
    PvalueTable,
    /// Bare sample identifiers.
    SampleHeader,
    SampleMetadata,
    ObservationMetadata,
    ChildrenMap,
    Node,
    Link,
    Metadata,
    NetworkMetadata,
}

impl DataKind {
    pub const ALL: [DataKind; 12] = [
        DataKind::OtuTable,
        DataKind::InteractionTable,
        DataKind::CorrelationTable,
        DataKind::PvalueTable,
        DataKind::SampleHeader,
        DataKind::SampleMetadata,
        DataKind::ObservationMetadata,
        DataKind::ChildrenMap,
        DataKind::Node,
        DataKind::Link,
        DataKind::Metadata,
        DataKind::NetworkMetadata,
    ];

    /// Datatype name as written in pipeline definitions.
    pub fn name(&self) -> &'static str {
        match self {
            DataKind::OtuTable => "otu_table",
            DataKind::InteractionTable => "interaction_table",
            DataKind::CorrelationTable => "correlation_table",
            DataKind::PvalueTable => "pvalue_table",
            DataKind::SampleHeader => "sample_header",
            DataKind::SampleMetadata => "sample_metadata",
            DataKind::ObservationMetadata => "observation_metadata",
            DataKind::ChildrenMap => "children_map",
            DataKind::Node => "node",
            DataKind::Link => "link",
            DataKind::Metadata => "metadata",
            DataKind::NetworkMetadata => "network_metadata",
        }
    }

    /// What kind of [`DataObject`] this data kind is carried in.
    pub fn expected_object(&self) -> &'static str {
        match self {
            DataKind::OtuTable => "abundance table",
            DataKind::InteractionTable | DataKind::CorrelationTable | DataKind::PvalueTable => {
                "labeled matrix"
            }
            DataKind::SampleHeader => "label list",
            DataKind::SampleMetadata | DataKind::ObservationMetadata => "metadata frame",
            DataKind::ChildrenMap
            | DataKind::Node
            | DataKind::Link
            | DataKind::Metadata
            | DataKind::NetworkMetadata => "JSON document",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ValidationError::UnknownField {
                target: "data kind",
                field: s.to_string(),
            })
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fail fast (default) or collect every violation.
    pub mode: Mode,
    /// Float tolerance for column sums and symmetry.
    pub tolerance: Tolerance,
    /// Whether abundance tables must be normalized.
    pub normalized: bool,
    /// Whether generic interaction matrices must be symmetric.
    pub symmetric: bool,
}

impl EngineConfig {
    /// Parse from JSON; absent keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(text).map_err(|e| ValidationError::WrongType {
            target: "engine config",
            expected: "a valid configuration object".to_string(),
            found: e.to_string(),
        })
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn with_symmetric(mut self, symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self
    }
}

/// Dispatches candidates to the validator for their declared data kind.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate `object` as `kind`.
    ///
    /// An object of the wrong shape for `kind` fails with `WrongType` before
    /// any rule runs.
    pub fn validate(&self, kind: DataKind, object: &DataObject) -> Result<(), Violations> {
        log::debug!(
            "validating {} as {} ({:?})",
            object.describe(),
            kind,
            self.config.mode
        );

        let mode = self.config.mode;
        match (kind, object) {
            (DataKind::OtuTable, DataObject::Table(table)) => self.validate_table(table),
            (DataKind::InteractionTable, DataObject::Matrix(m))
            | (DataKind::CorrelationTable, DataObject::Matrix(m))
            | (DataKind::PvalueTable, DataObject::Matrix(m)) => self.validate_matrix(kind, m),
            (DataKind::SampleHeader, DataObject::Labels(ids)) => {
                HeaderValidator.validate_with(ids.as_slice(), mode)
            }
            (DataKind::SampleMetadata, DataObject::Frame(frame)) => {
                SampleMetadataValidator.validate_with(frame, mode)
            }
            (DataKind::ObservationMetadata, DataObject::Frame(frame)) => {
                ObservationMetadataValidator.validate_with(frame, mode)
            }
            (DataKind::ChildrenMap, DataObject::Json(value)) => {
                ChildrenMapValidator.validate_with(value, mode)
            }
            (DataKind::Node, DataObject::Json(value)) => self.validate_record::<NodeRecord>(value),
            (DataKind::Link, DataObject::Json(value)) => self.validate_record::<LinkRecord>(value),
            (DataKind::Metadata, DataObject::Json(value)) => {
                self.validate_record::<MetadataRecord>(value)
            }
            (DataKind::NetworkMetadata, DataObject::Json(value)) => {
                self.validate_record::<NetworkMetadataRecord>(value)
            }
            (kind, other) => Err(ValidationError::WrongType {
                target: kind.name(),
                expected: kind.expected_object().to_string(),
                found: other.describe().to_string(),
            }
            .into()),
        }
    }

    /// Validate an abundance table with the configured normalization.
    pub fn validate_table(&self, table: &BiomTable) -> Result<(), Violations> {
        TableValidator::new(self.config.normalized)
            .with_tolerance(self.config.tolerance)
            .validate_with(table, self.config.mode)
    }

    /// Validate a matrix as one of the matrix kinds.
    pub fn validate_matrix(&self, kind: DataKind, matrix: &LabeledMatrix) -> Result<(), Violations> {
        let mode = self.config.mode;
        let tolerance = self.config.tolerance;
        match kind {
            DataKind::CorrelationTable => CorrelationMatrixValidator::new()
                .with_tolerance(tolerance)
                .validate_with(matrix, mode),
            DataKind::PvalueTable => PvalueMatrixValidator::new().validate_with(matrix, mode),
            DataKind::InteractionTable => InteractionMatrixValidator::new(self.config.symmetric)
                .with_tolerance(tolerance)
                .validate_with(matrix, mode),
            other => Err(ValidationError::WrongType {
                target: other.name(),
                expected: other.expected_object().to_string(),
                found: "labeled matrix".to_string(),
            }
            .into()),
        }
    }

    /// Validate a JSON record against the schema of `R`.
    pub fn validate_record<R: Record>(&self, value: &serde_json::Value) -> Result<(), Violations> {
        R::schema().validate_with(value, self.config.mode)
    }
}
