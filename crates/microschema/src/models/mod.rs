//! Fixed-schema records for the network representation.

mod children;
mod fields;
mod network;

pub use children::{ChildrenMap, ChildrenMapValidator};
pub use fields::{FieldSpec, FieldType, RecordSchema};
pub use network::{
    records_from_array, Directionality, LinkRecord, MetadataRecord, NetworkMetadataRecord,
    NodeRecord, Record,
};
