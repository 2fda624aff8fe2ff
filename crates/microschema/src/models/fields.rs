//! Declarative field schemas for JSON-shaped records.

use std::ops::ControlFlow;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value as Json};

use crate::error::ValidationError;
use crate::validation::{Sink, Validator};

/// Expected JSON shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    /// Any JSON number.
    Float,
    /// ISO `YYYY-MM-DD` string.
    Date,
    StringList,
    /// Object of string values.
    StringMap,
}

impl FieldType {
    fn describe(&self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Integer => "an integer",
            FieldType::Float => "a number",
            FieldType::Date => "a YYYY-MM-DD date",
            FieldType::StringList => "a list of strings",
            FieldType::StringMap => "a map of strings",
        }
    }
}

/// Short name of a JSON value's type.
pub(crate) fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Json::Number(_) => "float",
        Json::String(_) => "string",
        Json::Array(_) => "list",
        Json::Object(_) => "object",
    }
}

/// Constraints on one field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    ty: FieldType,
    required: bool,
    min_length: Option<usize>,
    pattern: Option<Regex>,
}

impl FieldSpec {
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
            min_length: None,
            pattern: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    /// Whole-string match against `pattern`. Fails if `pattern` does not compile.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(&format!("^(?:{pattern})$"))?);
        Ok(self)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    fn check_value(&self, target: &'static str, value: &Json, sink: &mut Sink) -> ControlFlow<()> {
        let wrong_type = || ValidationError::WrongType {
            target,
            expected: format!("{} to be {}", self.name, self.ty.describe()),
            found: json_type(value).to_string(),
        };

        match (self.ty, value) {
            (FieldType::String, Json::String(s)) => self.check_string(target, s, sink),
            (FieldType::Integer, Json::Number(n)) if n.is_i64() => ControlFlow::Continue(()),
            (FieldType::Float, Json::Number(_)) => ControlFlow::Continue(()),
            (FieldType::Date, Json::String(s)) => {
                if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                    sink.report(ValidationError::InvalidNameFormat {
                        target,
                        field: self.name.to_string(),
                        value: s.clone(),
                    })?;
                }
                ControlFlow::Continue(())
            }
            (FieldType::StringList, Json::Array(items)) => {
                if let Some(bad) = items.iter().find(|v| !v.is_string()) {
                    sink.report(ValidationError::NonStringElement {
                        target,
                        what: "list elements",
                        value: format!("{bad} in {}", self.name),
                    })?;
                }
                ControlFlow::Continue(())
            }
            (FieldType::StringMap, Json::Object(map)) => {
                if let Some((key, bad)) = map.iter().find(|(_, v)| !v.is_string()) {
                    sink.report(ValidationError::NonStringElement {
                        target,
                        what: "map values",
                        value: format!("{bad} at {}.{key}", self.name),
                    })?;
                }
                ControlFlow::Continue(())
            }
            _ => sink.report(wrong_type()),
        }
    }

    fn check_string(&self, target: &'static str, s: &str, sink: &mut Sink) -> ControlFlow<()> {
        if let Some(min) = self.min_length {
            if s.chars().count() < min {
                sink.report(ValidationError::OutOfRangeValue {
                    target,
                    field: self.name.to_string(),
                    value: format!("'{s}'"),
                    expected: format!("at least {min} characters"),
                })?;
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(s) {
                sink.report(ValidationError::InvalidNameFormat {
                    target,
                    field: self.name.to_string(),
                    value: s.to_string(),
                })?;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Ordered set of field constraints for one record kind.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Start from another schema's fields under a new name.
    pub fn extending(name: &'static str, base: &RecordSchema) -> Self {
        Self {
            name,
            fields: base.fields.clone(),
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn record_name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn check_object(&self, object: &Map<String, Json>, sink: &mut Sink) -> ControlFlow<()> {
        for key in object.keys() {
            if !self.fields.iter().any(|f| f.name == key.as_str()) {
                sink.report(ValidationError::UnknownField {
                    target: self.name,
                    field: key.clone(),
                })?;
            }
        }

        for spec in &self.fields {
            match object.get(spec.name) {
                None | Some(Json::Null) => {
                    if spec.required {
                        sink.report(ValidationError::RequiredFieldMissing {
                            target: self.name,
                            field: spec.name.to_string(),
                        })?;
                    }
                }
                Some(value) => spec.check_value(self.name, value, sink)?,
            }
        }
        ControlFlow::Continue(())
    }
}

impl Validator<Json> for RecordSchema {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, value: &Json, sink: &mut Sink) -> ControlFlow<()> {
        match value {
            Json::Object(object) => self.check_object(object, sink),
            other => sink.report(ValidationError::WrongType {
                target: self.name,
                expected: "a JSON object".to_string(),
                found: json_type(other).to_string(),
            }),
        }
    }
}
