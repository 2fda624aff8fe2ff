//! Observation metadata: the ordered taxonomic hierarchy.
//!
//! Observation metadata columns are drawn from a fixed ordered list of ranks
//! plus an optional `Confidence` column. The ranks that are present must form
//! a contiguous prefix of the hierarchy, so a table that has `Genus` also has
//! everything from `Kingdom` through `Family`, in that order.

use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::frame::{Column, MetadataFrame, Value};

use super::primitives::check_frame_alignment;
use super::validator::{Sink, Validator};

/// Name of the optional per-observation classifier confidence column.
pub const CONFIDENCE_COLUMN: &str = "Confidence";

const TARGET: &str = "observation metadata";

/// A rank in the taxonomic hierarchy, from broadest to narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaxonomicLevel {
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
}

impl TaxonomicLevel {
    /// Every level in hierarchy order.
    pub const ALL: [TaxonomicLevel; 7] = [
        TaxonomicLevel::Kingdom,
        TaxonomicLevel::Phylum,
        TaxonomicLevel::Class,
        TaxonomicLevel::Order,
        TaxonomicLevel::Family,
        TaxonomicLevel::Genus,
        TaxonomicLevel::Species,
    ];

    /// Column name for this level.
    pub fn name(&self) -> &'static str {
        match self {
            TaxonomicLevel::Kingdom => "Kingdom",
            TaxonomicLevel::Phylum => "Phylum",
            TaxonomicLevel::Class => "Class",
            TaxonomicLevel::Order => "Order",
            TaxonomicLevel::Family => "Family",
            TaxonomicLevel::Genus => "Genus",
            TaxonomicLevel::Species => "Species",
        }
    }

    /// Position in [`TaxonomicLevel::ALL`].
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Look up a level by its exact column name.
    pub fn from_name(name: &str) -> Option<TaxonomicLevel> {
        Self::ALL.iter().copied().find(|level| level.name() == name)
    }

    /// Pattern a non-empty name at this level must match.
    pub fn name_pattern(&self) -> &'static Regex {
        &NAME_REGEXES[self.rank()]
    }

    /// Returns true if `name` is a well-formed taxon name for this level.
    pub fn is_valid_name(&self, name: &str) -> bool {
        self.name_pattern().is_match(name)
    }
}

impl fmt::Display for TaxonomicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaxonomicLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaxonomicLevel::from_name(s).ok_or_else(|| ValidationError::UnknownField {
            target: TARGET,
            field: s.to_string(),
        })
    }
}

// Ranks above species are capitalized; species epithets are lowercase.
const RANK_NAME: &str = r"^[A-Z][a-zA-Z0-9\-._]+$";
const SPECIES_NAME: &str = r"^[a-z][a-zA-Z0-9\-._]+$";

/// Name pattern per level, indexed by [`TaxonomicLevel::rank`].
const NAME_PATTERNS: [(TaxonomicLevel, &str); 7] = [
    (TaxonomicLevel::Kingdom, RANK_NAME),
    (TaxonomicLevel::Phylum, RANK_NAME),
    (TaxonomicLevel::Class, RANK_NAME),
    (TaxonomicLevel::Order, RANK_NAME),
    (TaxonomicLevel::Family, RANK_NAME),
    (TaxonomicLevel::Genus, RANK_NAME),
    (TaxonomicLevel::Species, SPECIES_NAME),
];

static NAME_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    NAME_PATTERNS
        .iter()
        .map(|(_, pattern)| Regex::new(pattern).unwrap())
        .collect()
});

/// Validates the per-observation taxonomy frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservationMetadataValidator;

impl ObservationMetadataValidator {
    fn check_index(&self, frame: &MetadataFrame, sink: &mut Sink) -> ControlFlow<()> {
        if let Some(bad) = frame.index().iter().find(|v| !v.is_str()) {
            sink.report(ValidationError::NonStringElement {
                target: TARGET,
                what: "indices",
                value: bad.to_string(),
            })?;
        }
        ControlFlow::Continue(())
    }

    fn check_known_columns(&self, frame: &MetadataFrame, sink: &mut Sink) -> ControlFlow<()> {
        for name in frame.column_names() {
            if name != CONFIDENCE_COLUMN && TaxonomicLevel::from_name(name).is_none() {
                sink.report(ValidationError::UnknownField {
                    target: TARGET,
                    field: name.to_string(),
                })?;
            }
        }
        ControlFlow::Continue(())
    }

    /// The i-th hierarchy column must be `TaxonomicLevel::ALL[i]`.
    fn check_hierarchy(&self, frame: &MetadataFrame, sink: &mut Sink) -> ControlFlow<()> {
        let present = frame.column_names().filter_map(TaxonomicLevel::from_name);
        for (position, level) in present.enumerate() {
            let expected = TaxonomicLevel::ALL[position];
            if level != expected {
                return sink.report(ValidationError::HierarchyOutOfOrder {
                    target: TARGET,
                    expected: expected.name().to_string(),
                    found: level.name().to_string(),
                });
            }
        }
        ControlFlow::Continue(())
    }

    fn check_confidence(&self, frame: &MetadataFrame, sink: &mut Sink) -> ControlFlow<()> {
        let Some(column) = frame.column(CONFIDENCE_COLUMN) else {
            return ControlFlow::Continue(());
        };
        match column {
            Column::Float(values) => {
                if let Some(bad) = values
                    .iter()
                    .find(|v| !v.is_nan() && !(0.0..=1.0).contains(*v))
                {
                    sink.report(ValidationError::OutOfRangeValue {
                        target: TARGET,
                        field: CONFIDENCE_COLUMN.to_string(),
                        value: bad.to_string(),
                        expected: "within [0, 1]".to_string(),
                    })?;
                }
            }
            other => {
                sink.report(ValidationError::WrongNumericType {
                    target: TARGET,
                    expected: "float64",
                    found: other.dtype(),
                })?;
            }
        }
        ControlFlow::Continue(())
    }

    fn check_names(&self, frame: &MetadataFrame, sink: &mut Sink) -> ControlFlow<()> {
        for (name, column) in frame.columns() {
            let Some(level) = TaxonomicLevel::from_name(name) else {
                continue;
            };
            for cell in column.values() {
                match cell {
                    Value::Null => {}
                    Value::Float(f) if f.is_nan() => {}
                    Value::Str(s) if s.is_empty() => {}
                    Value::Str(s) => {
                        if !level.is_valid_name(&s) {
                            sink.report(ValidationError::InvalidNameFormat {
                                target: TARGET,
                                field: level.name().to_string(),
                                value: s,
                            })?;
                            break;
                        }
                    }
                    other => {
                        sink.report(ValidationError::NonStringElement {
                            target: TARGET,
                            what: "taxonomy names",
                            value: format!("{other} in {level}"),
                        })?;
                        break;
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }
}

impl Validator<MetadataFrame> for ObservationMetadataValidator {
    fn name(&self) -> &'static str {
        "observation_metadata"
    }

    fn check(&self, value: &MetadataFrame, sink: &mut Sink) -> ControlFlow<()> {
        check_frame_alignment(TARGET, value, sink)?;
        self.check_index(value, sink)?;
        self.check_known_columns(value, sink)?;
        self.check_hierarchy(value, sink)?;
        self.check_confidence(value, sink)?;
        self.check_names(value, sink)
    }
}
