//! Tests for the pull-request backend against the in-memory content API.

use std::collections::BTreeMap;

use spark_source::remote::BRANCH_PREFIX;
use spark_source::remote::memory::content_sha;
use spark_source::{
    ErrorKind, FileChange, MemoryContentApi, PublishRequest, Published, RemoteSource, Source,
    SourceKind,
};

const MANIFEST: &str = "\
version: '1.0.0'
schema_version: 1
vendors:
  - name: Acme
    file: acme.yaml
  - name: Beta
    file: beta.yaml
";

const DEVICE_FILE: &str = "\
device_types:
  - vendor_name: Acme
    model_number: PM-1
    name: Meter One
    device_type: power_meter
    technology_config:
      technology: modbus
";

fn remote() -> RemoteSource<MemoryContentApi> {
    let api = MemoryContentApi::new("main");
    api.set_file("main", "manifest.yaml", MANIFEST);
    api.set_file("main", "devices/acme.yaml", DEVICE_FILE);
    api.set_file("main", "devices/beta.yaml", DEVICE_FILE);
    RemoteSource::new(api, "main")
}

async fn request_for(source: &RemoteSource<MemoryContentApi>) -> PublishRequest {
    let mut changes = BTreeMap::new();
    for path in ["devices/acme.yaml", "devices/beta.yaml"] {
        let fetched = source.fetch_collection(path).await.unwrap();
        changes.insert(
            path.to_string(),
            FileChange {
                content: format!("# edited\n{DEVICE_FILE}"),
                token: fetched.token,
            },
        );
    }
    PublishRequest {
        title: "Update device definitions via sparkctl".to_string(),
        body: "changes".to_string(),
        changes,
    }
}

fn created_branch(api: &MemoryContentApi) -> String {
    api.branches()
        .into_iter()
        .find(|b| b.starts_with(BRANCH_PREFIX))
        .expect("publish branch")
}

#[tokio::test]
async fn test_fetch_uses_content_hash_as_token() {
    let source = remote();
    assert_eq!(source.kind(), SourceKind::GitHub);

    let manifest = source.fetch_index().await.unwrap();
    assert_eq!(manifest.vendor_count(), 2);

    let fetched = source.fetch_collection("devices/acme.yaml").await.unwrap();
    assert_eq!(fetched.token.as_str(), content_sha(DEVICE_FILE));
}

#[tokio::test]
async fn test_fetch_missing_file() {
    let source = remote();
    let err = source.fetch_collection("devices/nope.yaml").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_publish_opens_pull_request() {
    let source = remote();
    let request = request_for(&source).await;

    let published = source.publish(&request).await.unwrap();
    let Published::PullRequest { url } = published else {
        panic!("expected a pull request");
    };

    let api = source.api();
    let prs = api.pull_requests();
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].url, url);
    assert_eq!(prs[0].base, "main");

    let branch = created_branch(api);
    assert_eq!(prs[0].head, branch);
    assert!(api.file(&branch, "devices/beta.yaml").unwrap().starts_with("# edited"));
    // Base branch untouched.
    assert_eq!(api.file("main", "devices/acme.yaml").unwrap(), DEVICE_FILE);
}

#[tokio::test]
async fn test_stale_token_is_conflict_and_leaves_branch() {
    let source = remote();
    let request = request_for(&source).await;

    // Someone else edits the second file after it was fetched.
    source
        .api()
        .set_file("main", "devices/beta.yaml", "device_types: []\n");

    let err = source.publish(&request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(err.to_string().contains("devices/beta.yaml"));

    let api = source.api();
    let branch = created_branch(api);
    assert!(api.file(&branch, "devices/acme.yaml").unwrap().starts_with("# edited"));
    assert_eq!(
        api.file(&branch, "devices/beta.yaml").unwrap(),
        "device_types: []\n"
    );
    assert!(api.pull_requests().is_empty());
}
