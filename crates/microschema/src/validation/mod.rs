//! Validation rules for abundance tables, matrices, and their metadata.

mod matrix;
mod primitives;
mod table;
mod taxonomy;
mod validator;

pub use matrix::{
    Bounds, CorrelationMatrixValidator, InteractionMatrixValidator, PvalueMatrixValidator,
};
pub use primitives::{DataValidator, HeaderValidator, IndexValidator, SampleMetadataValidator};
pub use table::TableValidator;
pub use taxonomy::{ObservationMetadataValidator, TaxonomicLevel, CONFIDENCE_COLUMN};
pub use validator::{Mode, Sink, Tolerance, Validator};
