use std::io::Write;

use flowai::cli::{dedup_records, read_json};
use flowai::{DedupConfig, DedupStrategy, FlowAiError};
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn dedup_config_loads_from_file() {
    let file = write_temp(r#"{"threshold": 0.75, "strategy": "connected"}"#);
    let config = DedupConfig::from_path(file.path()).expect("load config");
    assert_eq!(config.threshold, 0.75);
    assert_eq!(config.strategy, DedupStrategy::Connected);
}

#[test]
fn dedup_config_rejects_bad_values_and_missing_file() {
    let err = DedupConfig::from_json(r#"{"threshold": "high"}"#).unwrap_err();
    assert!(matches!(err, FlowAiError::InvalidThreshold(_)), "{err}");

    let err = DedupConfig::from_json(r#"{"threshold": 0.8, "strategy": 3}"#).unwrap_err();
    assert!(matches!(err, FlowAiError::Config(_)), "{err}");

    let missing = std::env::temp_dir().join("flowai-no-such-config.json");
    let err = DedupConfig::from_path(&missing).unwrap_err();
    assert!(matches!(err, FlowAiError::Config(_)));
}

#[test]
fn records_and_vectors_from_files_are_grouped() {
    let records_file = write_temp(r#"["alpha", "alpha copy", "beta"]"#);
    let vectors_file = write_temp("[[1.0, 0.0], [0.99, 0.01], [0.0, 1.0]]");

    let records: Vec<String> = read_json(records_file.path()).expect("read records");
    let vectors: Vec<Vec<f32>> = read_json(vectors_file.path()).expect("read vectors");
    let groups = dedup_records(&records, Some(vectors), &DedupConfig::default(), 384)
        .expect("dedup records");

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].canonical, "alpha");
    assert_eq!(groups[0].group, vec!["alpha", "alpha copy"]);
    assert_eq!(groups[1].group, vec!["beta"]);
}

#[test]
fn malformed_input_file_is_invalid_input() {
    let file = write_temp("{not json");
    let err = read_json::<Vec<String>>(file.path()).unwrap_err();
    assert!(matches!(err, FlowAiError::InvalidInput(_)));
}
