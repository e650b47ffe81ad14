//! Tests for the local directory backend.

use std::collections::BTreeMap;
use std::fs;

use spark_source::{
    ConcurrencyToken, ErrorKind, FileChange, LocalSource, PublishRequest, Published, Source,
    SourceKind,
};
use tempfile::tempdir;

const MANIFEST: &str = "\
version: '1.0.0'
schema_version: 1
vendors:
  - name: Acme
    file: acme.yaml
    technologies: [modbus]
";

const ACME: &str = "\
device_types:
  - vendor_name: Acme
    model_number: PM-1
    name: Meter One
    device_type: power_meter
    technology_config:
      technology: modbus
";

fn library() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("devices")).unwrap();
    fs::write(dir.path().join("manifest.yaml"), MANIFEST).unwrap();
    fs::write(dir.path().join("devices/acme.yaml"), ACME).unwrap();
    dir
}

fn change(path: &str, content: &str) -> (String, FileChange) {
    (
        path.to_string(),
        FileChange {
            content: content.to_string(),
            token: ConcurrencyToken::new(path),
        },
    )
}

#[tokio::test]
async fn test_fetch_index_and_collection() {
    let dir = library();
    let source = LocalSource::new(dir.path());
    assert_eq!(source.kind(), SourceKind::Local);
    assert!(source.can_write());

    let manifest = source.fetch_index().await.unwrap();
    assert_eq!(manifest.vendors[0].name, "Acme");

    let path = manifest.vendors[0].storage_path();
    let fetched = source.fetch_collection(&path).await.unwrap();
    assert_eq!(fetched.file.len(), 1);
    assert_eq!(fetched.token.as_str(), "devices/acme.yaml");
}

#[tokio::test]
async fn test_fetch_missing_file_is_not_found() {
    let dir = library();
    let source = LocalSource::new(dir.path());
    let err = source.fetch_collection("devices/none.yaml").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_fetch_malformed_file_is_parse_error() {
    let dir = library();
    fs::write(dir.path().join("devices/bad.yaml"), "device_types: [").unwrap();
    let source = LocalSource::new(dir.path());
    let err = source.fetch_collection("devices/bad.yaml").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn test_publish_writes_every_file() {
    let dir = library();
    let source = LocalSource::new(dir.path());
    let request = PublishRequest {
        title: "t".to_string(),
        body: "b".to_string(),
        changes: BTreeMap::from([
            change("devices/acme.yaml", "device_types: []\n"),
            change("devices/beta.yaml", "device_types: []\n"),
        ]),
    };

    let published = source.publish(&request).await.unwrap();
    assert_eq!(published, Published::Saved { count: 2 });
    assert_eq!(published.to_string(), "saved 2 file(s)");
    assert_eq!(
        fs::read_to_string(dir.path().join("devices/beta.yaml")).unwrap(),
        "device_types: []\n"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_publish_stops_at_failing_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = library();
    let locked = dir.path().join("locked");
    fs::create_dir_all(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores directory permissions.
    if fs::write(locked.join("probe"), "x").is_ok() {
        return;
    }

    let source = LocalSource::new(dir.path());
    let request = PublishRequest {
        changes: BTreeMap::from([
            change("devices/acme.yaml", "device_types: []\n"),
            change("locked/z.yaml", "device_types: []\n"),
        ]),
        ..PublishRequest::default()
    };

    let err = source.publish(&request).await.unwrap_err();
    assert!(err.to_string().contains("locked/z.yaml"));
    // Earlier files in the batch stay written.
    assert_eq!(
        fs::read_to_string(dir.path().join("devices/acme.yaml")).unwrap(),
        "device_types: []\n"
    );
}
