//! Integration tests for schema documents and reload-on-change sources.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use stargen::binding::{bind_report, BindingOptions, ReportRequest};
use stargen::loader::{load_schema, LoadError, SchemaSource};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn full_request() -> ReportRequest {
    ReportRequest {
        dimensions: vec!["Franchise Name".to_string(), "Store Name".to_string()],
        measures: vec!["Products Sold".to_string(), "Average Price".to_string()],
    }
}

#[test]
fn test_load_toml_fixture() {
    let schema = load_schema(&fixture("sales.toml")).unwrap();

    assert_eq!(schema.database.name(), "StarDB");
    assert_eq!(schema.database.tables().len(), 3);
    assert_eq!(schema.star.fact().name(), "FactSales");
    assert_eq!(schema.star.dimensions().len(), 2);
    assert_eq!(schema.star.metrics().len(), 2);
    assert_eq!(schema.star.measures().len(), 2);
}

#[test]
fn test_toml_and_json_compile_identically() {
    let toml = load_schema(&fixture("sales.toml")).unwrap();
    let json = load_schema(&fixture("sales.json")).unwrap();
    let options = BindingOptions::default();

    let from_toml = bind_report(&toml.star, &full_request(), options).unwrap();
    let from_json = bind_report(&json.star, &full_request(), options).unwrap();

    assert!(from_toml.is_some());
    assert_eq!(from_toml, from_json);
}

#[test]
fn test_missing_file() {
    let err = load_schema(&fixture("missing.toml")).unwrap_err();
    assert!(matches!(err, LoadError::FileNotFound { .. }));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.yaml");
    fs::write(&path, "database: StarDB").unwrap();

    let err = load_schema(&path).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedExtension { extension } if extension == "yaml"));
}

#[test]
fn test_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.json");
    fs::write(&path, "{ \"database\": ").unwrap();

    let err = load_schema(&path).unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));
}

#[test]
fn test_unknown_dimension_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.toml");
    fs::write(
        &path,
        r#"
database = "StarDB"
tables = [{ name = "FactSales" }]

[star]
fact = "FactSales"
dimensions = [{ name = "Store Name", table = "DimStore", column = "StoreName" }]
"#,
    )
    .unwrap();

    let err = load_schema(&path).unwrap_err();
    assert!(matches!(err, LoadError::UnknownTable { table, .. } if table == "DimStore"));
}

#[test]
fn test_duplicate_measure_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.toml");
    fs::write(
        &path,
        r#"
database = "StarDB"
tables = [{ name = "FactSales" }]

[star]
fact = "FactSales"
measures = [
    { name = "Units", function = "sum", table = "FactSales", column = "Quantity" },
    { name = "Units", function = "count", table = "FactSales", column = "Quantity" },
]
"#,
    )
    .unwrap();

    let err = load_schema(&path).unwrap_err();
    assert!(matches!(err, LoadError::DuplicateName { kind: "measure", name } if name == "Units"));
}

#[test]
fn test_source_caches_until_modified() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.toml");
    fs::copy(fixture("sales.toml"), &path).unwrap();

    let source = SchemaSource::new(&path);
    let first = source.schema().unwrap();
    let again = source.schema().unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    let content = fs::read_to_string(&path)
        .unwrap()
        .replace("name = \"Store Name\"", "name = \"Shop Name\"");
    fs::write(&path, content).unwrap();
    let later = SystemTime::now() + Duration::from_secs(60);
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(later)
        .unwrap();

    let reloaded = source.schema().unwrap();
    assert!(!Arc::ptr_eq(&first, &reloaded));
    assert!(reloaded.star.dimension("Shop Name").is_some());
    assert!(reloaded.star.dimension("Store Name").is_none());
    // Earlier handles keep the schema they were given.
    assert!(first.star.dimension("Store Name").is_some());
}

#[test]
fn test_source_invalidate_forces_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.json");
    fs::copy(fixture("sales.json"), &path).unwrap();

    let source = SchemaSource::new(&path);
    let first = source.schema().unwrap();
    source.invalidate();
    let second = source.schema().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(source.path(), path.as_path());
}

#[test]
fn test_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = SchemaSource::new(dir.path().join("gone.toml"));

    assert!(matches!(source.schema(), Err(LoadError::FileNotFound { .. })));
}
