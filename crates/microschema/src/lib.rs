//! Microschema: schema validation for microbial co-occurrence network pipelines.
//!
//! Every step of a network inference pipeline declares the kind of data it
//! consumes and produces. Microschema checks candidates against the rules of
//! those kinds before they are handed on: abundance tables with their sample
//! and taxonomy metadata, interaction, correlation and p-value matrices, and
//! the node, link and metadata records of the resulting network.
//!
//! # Core Principles
//!
//! - **Read-only**: Validators never modify the data they check
//! - **Ordered**: Rules run in a fixed order, so the first failure is stable
//! - **Two modes**: Stop at the first violation or collect all of them
//!
//! # Example
//!
//! ```no_run
//! use microschema::frame::{labels, BiomTable, DataObject, Value};
//! use microschema::{DataKind, Engine, EngineConfig};
//!
//! let sample = |diagnosis: &str| {
//!     indexmap::IndexMap::from([("diagnosis".to_string(), Value::from(diagnosis))])
//! };
//! let table = BiomTable::new(
//!     ndarray::array![[0.25, 0.5], [0.75, 0.5]],
//!     labels(["otu1", "otu2"]),
//!     labels(["s1", "s2"]),
//! )
//! .with_sample_metadata(vec![sample("CD"), sample("UC")]);
//!
//! let engine = Engine::new(EngineConfig::default().with_normalized(true));
//! match engine.validate(DataKind::OtuTable, &DataObject::from(table)) {
//!     Ok(()) => println!("table is valid"),
//!     Err(violations) => println!("{violations}"),
//! }
//! ```

pub mod error;
pub mod frame;
pub mod models;
pub mod validation;

mod engine;

pub use engine::{DataKind, Engine, EngineConfig};
pub use error::{ErrorKind, Result, ValidationError, Violations};
pub use frame::{BiomTable, DataObject, LabeledMatrix, MetadataFrame, Value};
pub use models::{ChildrenMap, LinkRecord, MetadataRecord, NetworkMetadataRecord, NodeRecord, Record};
pub use validation::{Mode, Tolerance, Validator};
