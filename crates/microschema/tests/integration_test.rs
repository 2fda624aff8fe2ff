//! Integration tests for microschema.

use indexmap::IndexMap;
use ndarray::array;
use serde_json::json;

use microschema::frame::{
    labels, AbundanceContainer, Axis, AxisMetadata, Column, DType, NumericData,
};
use microschema::models::records_from_array;
use microschema::validation::{
    CorrelationMatrixValidator, DataValidator, ObservationMetadataValidator,
    PvalueMatrixValidator, TableValidator,
};
use microschema::{
    BiomTable, ChildrenMap, DataKind, DataObject, Engine, EngineConfig, ErrorKind, LabeledMatrix,
    LinkRecord, MetadataFrame, Mode, NetworkMetadataRecord, NodeRecord, Record, ValidationError,
    Validator, Value,
};

/// Helper to build one metadata record from key/value pairs.
fn record(pairs: &[(&str, &str)]) -> AxisMetadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

/// A normalized 3 observations × 2 samples table with full metadata.
fn gut_table() -> BiomTable {
    BiomTable::new(
        array![[0.1, 0.6], [0.3, 0.4], [0.6, 0.0]],
        labels(["otu1", "otu2", "otu3"]),
        labels(["S001", "S002"]),
    )
    .with_sample_metadata(vec![
        record(&[("diagnosis", "CD"), ("site", "ileum")]),
        record(&[("diagnosis", "UC"), ("site", "colon")]),
    ])
    .with_observation_metadata(vec![
        record(&[
            ("Kingdom", "Bacteria"),
            ("Phylum", "Firmicutes"),
            ("Class", "Clostridia"),
        ]),
        record(&[
            ("Kingdom", "Bacteria"),
            ("Phylum", "Bacteroidetes"),
            ("Class", "Bacteroidia"),
        ]),
        record(&[("Kingdom", "Bacteria"), ("Phylum", "Proteobacteria"), ("Class", "")]),
    ])
}

fn provenance() -> serde_json::Value {
    json!({
        "host": "human",
        "condition": "IBD",
        "location": "gut",
        "experimental_metadata": {"sequencing": "16S rRNA V4"},
        "pubmed_id": "31142855",
        "description": "Gut microbiome of IBD patients",
        "date": "2019-05-29",
        "authors": ["Lloyd-Price J", "Arze C"]
    })
}

// =============================================================================
// Abundance Table Tests
// =============================================================================

#[test]
fn test_valid_table_passes_in_both_modes() {
    let table = gut_table();
    let validator = TableValidator::new(true);
    assert!(validator.validate(&table).is_ok());
    assert!(validator.validate_all(&table).is_ok());
}

#[test]
fn test_raw_counts_fail_only_when_normalized() {
    let table = BiomTable::new(
        array![[12.0, 3.0], [0.0, 41.0]],
        labels(["otu1", "otu2"]),
        labels(["S001", "S002"]),
    )
    .with_sample_metadata(vec![record(&[("diagnosis", "CD")]), record(&[("diagnosis", "UC")])]);

    assert!(TableValidator::new(false).validate(&table).is_ok());

    let err = TableValidator::new(true).validate(&table).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRangeValue);

    let all = TableValidator::new(true).validate_all(&table).unwrap_err();
    assert_eq!(
        all.kinds(),
        vec![ErrorKind::OutOfRangeValue, ErrorKind::NotNormalized]
    );
}

#[test]
fn test_integer_payload_is_wrong_numeric_type() {
    let table = BiomTable::new(
        array![[1_i64, 0], [0, 1]],
        labels(["otu1", "otu2"]),
        labels(["S001", "S002"]),
    )
    .with_sample_metadata(vec![record(&[("diagnosis", "CD")]), record(&[("diagnosis", "UC")])]);

    let err = TableValidator::new(false).validate(&table).unwrap_err();
    assert_eq!(
        err,
        ValidationError::WrongNumericType {
            target: "data",
            expected: "float64",
            found: DType::Int64,
        }
    );
}

#[test]
fn test_negative_abundance() {
    let data = NumericData::from(array![[0.5, -0.1], [0.5, 1.1]]);
    let err = DataValidator::new(false).validate(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NegativeValue);
}

#[test]
fn test_table_rule_order_in_collect_mode() {
    let table = BiomTable::new(
        array![[-1.0, 0.5], [3.0, 0.5]],
        vec![Value::from("otu1"), Value::from("otu1")],
        vec![Value::from("S001"), Value::from(7_i64)],
    );

    let all = TableValidator::new(true).validate_all(&table).unwrap_err();
    assert_eq!(
        all.kinds(),
        vec![
            ErrorKind::NonStringElement,
            ErrorKind::DuplicateIdentifier,
            ErrorKind::NegativeValue,
            ErrorKind::OutOfRangeValue,
            ErrorKind::NotNormalized,
            ErrorKind::EmptyColumnSet,
            ErrorKind::MalformedHeaderRow,
        ]
    );

    let first = TableValidator::new(true).validate(&table).unwrap_err();
    assert_eq!(Some(&first), all.first());
}

#[test]
fn test_mismatched_payload_is_wrong_type() {
    let table = BiomTable::new(
        array![[0.5, 0.5]],
        labels(["otu1", "otu2"]),
        labels(["S001", "S002"]),
    );
    let all = TableValidator::new(false).validate_all(&table).unwrap_err();
    assert_eq!(all.kinds(), vec![ErrorKind::WrongType]);
}

// =============================================================================
// Metadata Tests
// =============================================================================

#[test]
fn test_sample_metadata_rules() {
    let table = gut_table();
    let engine = Engine::default();

    let frame = MetadataFrame::new(labels(["#SampleID", "S001"])).with_column("site", vec!["a", "b"]);
    let err = engine
        .validate(DataKind::SampleMetadata, &DataObject::from(frame))
        .unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::MalformedHeaderRow]);

    let frame = MetadataFrame::new(labels(["S001", "S001"])).with_column("site", vec!["a", "b"]);
    let err = engine
        .validate(DataKind::SampleMetadata, &DataObject::from(frame))
        .unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::DuplicateIdentifier]);

    let frame = table.metadata_frame(Axis::Sample);
    assert_eq!(frame.column_names().collect::<Vec<_>>(), vec!["diagnosis", "site"]);
    assert!(engine
        .validate(DataKind::SampleMetadata, &DataObject::from(frame))
        .is_ok());
}

#[test]
fn test_observation_metadata_hierarchy() {
    let frame = MetadataFrame::new(labels(["otu1"]))
        .with_column("Kingdom", vec!["Bacteria"])
        .with_column("Class", vec!["Clostridia"]);
    let err = ObservationMetadataValidator.validate(&frame).unwrap_err();
    assert_eq!(
        err,
        ValidationError::HierarchyOutOfOrder {
            target: "observation metadata",
            expected: "Phylum".to_string(),
            found: "Class".to_string(),
        }
    );
}

#[test]
fn test_skipped_levels_are_out_of_order() {
    let skipped = MetadataFrame::new(labels(["otu1"]))
        .with_column("Kingdom", vec!["Bacteria"])
        .with_column("Phylum", vec!["Firmicutes"])
        .with_column("Genus", vec!["Blautia"]);
    assert_eq!(
        ObservationMetadataValidator.validate(&skipped).unwrap_err().kind(),
        ErrorKind::HierarchyOutOfOrder
    );

    let prefix = MetadataFrame::new(labels(["otu1"]))
        .with_column("Kingdom", vec!["Bacteria"])
        .with_column("Phylum", vec!["Firmicutes"])
        .with_column("Class", vec!["Clostridia"])
        .with_column("Confidence", vec![1.5]);
    assert_eq!(
        ObservationMetadataValidator.validate(&prefix).unwrap_err().kind(),
        ErrorKind::OutOfRangeValue
    );
}

#[test]
fn test_observation_metadata_confidence_and_names() {
    let frame = MetadataFrame::new(labels(["otu1", "otu2"]))
        .with_column("Kingdom", vec!["Bacteria", "Bacteria"])
        .with_column("Phylum", vec!["Firmicutes", "firmicutes"])
        .with_column("Confidence", vec![0.98, 1.4]);

    let all = ObservationMetadataValidator.validate_all(&frame).unwrap_err();
    assert_eq!(
        all.kinds(),
        vec![ErrorKind::OutOfRangeValue, ErrorKind::InvalidNameFormat]
    );

    let frame = MetadataFrame::new(labels(["otu1"]))
        .with_column("Kingdom", vec!["Bacteria"])
        .with_column("Confidence", Column::from(vec!["high"]));
    let err = ObservationMetadataValidator.validate(&frame).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongNumericType);
}

#[test]
fn test_species_level_is_lowercase() {
    let frame = MetadataFrame::new(labels(["otu1"]))
        .with_column("Kingdom", vec!["Bacteria"])
        .with_column("Phylum", vec!["Firmicutes"])
        .with_column("Class", vec!["Clostridia"])
        .with_column("Order", vec!["Clostridiales"])
        .with_column("Family", vec!["Ruminococcaceae"])
        .with_column("Genus", vec!["Faecalibacterium"])
        .with_column("Species", vec!["prausnitzii"]);
    assert!(ObservationMetadataValidator.validate(&frame).is_ok());
}

// =============================================================================
// Matrix Tests
// =============================================================================

#[test]
fn test_correlation_matrix() {
    let ids = labels(["otu1", "otu2", "otu3"]);
    let m = LabeledMatrix::square(
        array![[1.0, 0.4, -0.2], [0.4, 1.0, 0.7], [-0.2, 0.7, 1.0]],
        ids.clone(),
    );
    assert!(CorrelationMatrixValidator::new().validate(&m).is_ok());

    let m = LabeledMatrix::square(
        array![[1.0, 1.5, -0.2], [1.5, 1.0, 0.7], [-0.2, 0.7, 1.0]],
        ids,
    );
    let err = CorrelationMatrixValidator::new().validate(&m).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRangeValue);
}

#[test]
fn test_transposed_labels_are_label_mismatch() {
    let m = LabeledMatrix::new(
        array![[1.0, 0.1], [0.1, 1.0]],
        labels(["otu1", "otu2"]),
        labels(["otu2", "otu1"]),
    );
    let err = CorrelationMatrixValidator::new().validate(&m).unwrap_err();
    assert_eq!(
        err,
        ValidationError::LabelMismatch {
            target: "correlation matrix",
            position: 0,
            row: "otu1".to_string(),
            column: "otu2".to_string(),
        }
    );
}

#[test]
fn test_pvalue_matrix_need_not_be_symmetric() {
    let m = LabeledMatrix::square(array![[0.0, 0.01], [0.2, 0.0]], labels(["a", "b"]));
    assert!(PvalueMatrixValidator::new().validate(&m).is_ok());

    let m = LabeledMatrix::square(array![[0.0, -0.01], [0.2, 0.0]], labels(["a", "b"]));
    assert_eq!(
        PvalueMatrixValidator::new().validate(&m).unwrap_err().kind(),
        ErrorKind::OutOfRangeValue
    );
}

#[test]
fn test_non_square_matrix() {
    let m = LabeledMatrix::new(
        array![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
        labels(["a", "b"]),
        labels(["a", "b", "c"]),
    );
    let engine = Engine::new(EngineConfig::default().with_mode(Mode::CollectAll));
    let err = engine
        .validate(DataKind::InteractionTable, &DataObject::from(m))
        .unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::ShapeMismatch]);
}

// =============================================================================
// Record Tests
// =============================================================================

#[test]
fn test_network_records_roundtrip_through_engine() {
    let engine = Engine::default();

    let mut meta = provenance();
    meta["directionality"] = json!("undirected");
    meta["computation_metadata"] = json!({"algorithm": "SparCC", "iterations": "20"});
    assert!(engine
        .validate(DataKind::NetworkMetadata, &DataObject::from(meta.clone()))
        .is_ok());
    let record = NetworkMetadataRecord::from_json(&meta).unwrap();
    assert_eq!(record.provenance.pubmed_id, "31142855");

    let err = engine
        .validate(DataKind::Metadata, &DataObject::from(meta))
        .unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::UnknownField]);
}

#[test]
fn test_nodes_and_links() {
    let nodes: Vec<NodeRecord> = records_from_array(&json!([
        {"id": "otu1", "name": "Faecalibacterium", "taxlevel": "Genus", "abundance": 0.3},
        {"id": "otu2", "lineage": ["Bacteria", "Bacteroidetes"], "taxid": 976}
    ]))
    .unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1].taxid, Some(976));

    let links: Vec<LinkRecord> = records_from_array(&json!([
        {"source": "otu1", "target": "otu2", "weight": -0.45, "pvalue": 0.003}
    ]))
    .unwrap();
    assert_eq!(links[0].weight, Some(-0.45));

    let engine = Engine::default();
    let err = engine
        .validate(DataKind::Node, &DataObject::from(json!({"taxid": "976"})))
        .unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::WrongType]);
}

#[test]
fn test_children_map() {
    let value = json!({"Bacteria": ["Firmicutes", "Bacteroidetes"], "Firmicutes": ["Clostridia"]});
    let engine = Engine::default();
    assert!(engine
        .validate(DataKind::ChildrenMap, &DataObject::from(value.clone()))
        .is_ok());

    let map = ChildrenMap::from_json(&value).unwrap();
    assert_eq!(map.parent_of("Clostridia"), Some("Firmicutes"));
}

// =============================================================================
// Engine Tests
// =============================================================================

#[test]
fn test_engine_dispatch_by_name() {
    let config = EngineConfig::from_json(r#"{"normalized": true}"#).unwrap();
    let engine = Engine::new(config);
    let kind: DataKind = "otu_table".parse().unwrap();
    assert!(engine.validate(kind, &DataObject::from(gut_table())).is_ok());

    let header = DataObject::Labels(vec![Value::from("S001"), Value::Null]);
    let err = engine.validate(DataKind::SampleHeader, &header).unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::NonStringElement]);
}

#[test]
fn test_engine_rejects_mismatched_objects() {
    let engine = Engine::default();
    let matrix = DataObject::from(LabeledMatrix::square(array![[1.0]], labels(["a"])));
    for kind in [DataKind::OtuTable, DataKind::Node, DataKind::SampleMetadata] {
        let err = engine.validate(kind, &matrix).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::WrongType], "for {kind}");
    }
}

#[test]
fn test_collect_all_first_matches_fail_fast() {
    let mut inputs: Vec<(DataKind, DataObject)> = vec![
        (DataKind::OtuTable, DataObject::from(gut_table())),
        (
            DataKind::CorrelationTable,
            DataObject::from(LabeledMatrix::new(
                array![["x".to_string()]],
                labels(["a"]),
                labels(["b"]),
            )),
        ),
        (
            DataKind::Link,
            DataObject::from(json!({"source": "a", "target": 3, "colour": "red"})),
        ),
    ];
    let mut bad_obs = IndexMap::new();
    bad_obs.insert("Phylum".to_string(), Value::from("Firmicutes"));
    inputs.push((
        DataKind::OtuTable,
        DataObject::from(
            BiomTable::new(array![[2.0]], labels(["otu1"]), labels(["S001"]))
                .with_observation_metadata(vec![bad_obs]),
        ),
    ));

    let fast = Engine::new(EngineConfig::default().with_normalized(true));
    let all = Engine::new(
        EngineConfig::default()
            .with_normalized(true)
            .with_mode(Mode::CollectAll),
    );

    for (kind, object) in &inputs {
        match (fast.validate(*kind, object), all.validate(*kind, object)) {
            (Ok(()), Ok(())) => {}
            (Err(first), Err(every)) => {
                assert_eq!(first.len(), 1);
                assert_eq!(first.first(), every.first(), "for {kind}");
            }
            (a, b) => panic!("modes disagree for {kind}: {a:?} vs {b:?}"),
        }
    }
}

#[test]
fn test_validation_is_repeatable() {
    let table = BiomTable::new(
        array![[0.7, 0.2], [0.7, 0.9]],
        labels(["otu1", "otu2"]),
        labels(["S001", "S002"]),
    );
    let validator = TableValidator::new(true);
    let first = validator.validate_all(&table).unwrap_err();
    let second = validator.validate_all(&table).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}
