//! Hierarchy edges kept outside the table model.

use std::ops::ControlFlow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{Result, ValidationError};
use crate::validation::{Sink, Validator};

use super::fields::json_type;

const TARGET: &str = "children map";

/// Taxon name → names of its immediate descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildrenMap(IndexMap<String, Vec<String>>);

impl ChildrenMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and build from a JSON object.
    pub fn from_json(value: &Json) -> Result<Self> {
        ChildrenMapValidator.validate(value)?;
        serde_json::from_value(value.clone()).map_err(|e| ValidationError::WrongType {
            target: TARGET,
            expected: "a map of string lists".to_string(),
            found: e.to_string(),
        })
    }

    /// Add `child` under `parent`, creating the entry if needed.
    pub fn insert(&mut self, parent: impl Into<String>, child: impl Into<String>) {
        self.0.entry(parent.into()).or_default().push(child.into());
    }

    pub fn children(&self, taxon: &str) -> Option<&[String]> {
        self.0.get(taxon).map(Vec::as_slice)
    }

    /// First taxon listing `taxon` as a child.
    pub fn parent_of(&self, taxon: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, children)| children.iter().any(|c| c == taxon))
            .map(|(parent, _)| parent.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl FromIterator<(String, Vec<String>)> for ChildrenMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// JSON shape of a children map: an object of string lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildrenMapValidator;

impl Validator<Json> for ChildrenMapValidator {
    fn name(&self) -> &'static str {
        "children_map"
    }

    fn check(&self, value: &Json, sink: &mut Sink) -> ControlFlow<()> {
        let Json::Object(map) = value else {
            return sink.report(ValidationError::WrongType {
                target: TARGET,
                expected: "an object with string keys".to_string(),
                found: json_type(value).to_string(),
            });
        };

        for (taxon, children) in map {
            let Json::Array(items) = children else {
                sink.report(ValidationError::WrongType {
                    target: TARGET,
                    expected: format!("a list of strings for {taxon}"),
                    found: json_type(children).to_string(),
                })?;
                continue;
            };
            if let Some(bad) = items.iter().find(|v| !v.is_string()) {
                sink.report(ValidationError::NonStringElement {
                    target: TARGET,
                    what: "children",
                    value: format!("{bad} under {taxon}"),
                })?;
            }
        }
        ControlFlow::Continue(())
    }
}
