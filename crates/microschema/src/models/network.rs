//! Records for the graph representation of an inferred network.

use chrono::NaiveDate;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{Result, ValidationError};
use crate::validation::{TaxonomicLevel, Validator};

use super::fields::{json_type, FieldSpec, FieldType, RecordSchema};

/// A fixed-schema record built from JSON after its schema passes.
pub trait Record: Sized + DeserializeOwned {
    /// Field constraints for this record kind.
    fn schema() -> &'static RecordSchema;

    /// Check `value` against the schema without building the record.
    fn validate(value: &Json) -> Result<()> {
        Self::schema().validate(value)
    }

    /// Validate and build.
    fn from_json(value: &Json) -> Result<Self> {
        Self::validate(value)?;
        serde_json::from_value(value.clone()).map_err(|e| ValidationError::WrongType {
            target: Self::schema().record_name(),
            expected: "a well-formed record".to_string(),
            found: e.to_string(),
        })
    }

    /// Parse, validate, and build.
    fn from_json_str(text: &str) -> Result<Self> {
        let value: Json = serde_json::from_str(text).map_err(|e| ValidationError::WrongType {
            target: Self::schema().record_name(),
            expected: "a JSON document".to_string(),
            found: e.to_string(),
        })?;
        Self::from_json(&value)
    }
}

/// Whether network edges have a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directionality {
    Undirected,
    Directed,
}

static METADATA_SCHEMA: Lazy<RecordSchema> = Lazy::new(|| {
    RecordSchema::new("metadata")
        .field(FieldSpec::new("host", FieldType::String).required())
        .field(FieldSpec::new("condition", FieldType::String).required())
        .field(FieldSpec::new("location", FieldType::String).required())
        .field(FieldSpec::new("experimental_metadata", FieldType::StringMap).required())
        .field(FieldSpec::new("pubmed_id", FieldType::String).required())
        .field(FieldSpec::new("description", FieldType::String).required())
        .field(FieldSpec::new("date", FieldType::Date).required())
        .field(FieldSpec::new("authors", FieldType::StringList).required())
});

static NETWORK_METADATA_SCHEMA: Lazy<RecordSchema> = Lazy::new(|| {
    RecordSchema::extending("network metadata", &METADATA_SCHEMA)
        .field(FieldSpec::new("computation_metadata", FieldType::StringMap))
        .field(FieldSpec::new("directionality", FieldType::String).pattern("undirected|directed").unwrap())
});

static NODE_SCHEMA: Lazy<RecordSchema> = Lazy::new(|| {
    let levels = TaxonomicLevel::ALL
        .iter()
        .map(TaxonomicLevel::name)
        .collect::<Vec<_>>()
        .join("|");
    RecordSchema::new("node")
        .field(FieldSpec::new("id", FieldType::String).min_length(2))
        .field(FieldSpec::new("lineage", FieldType::StringList))
        .field(FieldSpec::new("name", FieldType::String))
        .field(FieldSpec::new("taxid", FieldType::Integer))
        .field(FieldSpec::new("taxlevel", FieldType::String).pattern(&levels).unwrap())
        .field(FieldSpec::new("abundance", FieldType::Float))
        .field(FieldSpec::new("children", FieldType::StringList))
});

static LINK_SCHEMA: Lazy<RecordSchema> = Lazy::new(|| {
    RecordSchema::new("link")
        .field(FieldSpec::new("pvalue", FieldType::Float))
        .field(FieldSpec::new("weight", FieldType::Float))
        .field(FieldSpec::new("source", FieldType::String).min_length(2))
        .field(FieldSpec::new("target", FieldType::String).min_length(2))
});

/// Provenance shared by every network: where the data came from and who made it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub host: String,
    pub condition: String,
    pub location: String,
    pub experimental_metadata: IndexMap<String, String>,
    pub pubmed_id: String,
    pub description: String,
    pub date: NaiveDate,
    pub authors: Vec<String>,
}

impl Record for MetadataRecord {
    fn schema() -> &'static RecordSchema {
        &METADATA_SCHEMA
    }
}

/// Provenance plus how the network was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetadataRecord {
    #[serde(flatten)]
    pub provenance: MetadataRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computation_metadata: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directionality: Option<Directionality>,
}

impl Record for NetworkMetadataRecord {
    fn schema() -> &'static RecordSchema {
        &NETWORK_METADATA_SCHEMA
    }
}

/// A taxon in the network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineage: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxlevel: Option<TaxonomicLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abundance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

impl Record for NodeRecord {
    fn schema() -> &'static RecordSchema {
        &NODE_SCHEMA
    }
}

/// A weighted edge between two nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pvalue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Record for LinkRecord {
    fn schema() -> &'static RecordSchema {
        &LINK_SCHEMA
    }
}

/// Build every element of a JSON array as records of one kind.
pub fn records_from_array<R: Record>(value: &Json) -> Result<Vec<R>> {
    match value {
        Json::Array(items) => items.iter().map(R::from_json).collect(),
        other => Err(ValidationError::WrongType {
            target: R::schema().record_name(),
            expected: "a list of records".to_string(),
            found: json_type(other).to_string(),
        }),
    }
}
