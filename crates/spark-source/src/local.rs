//! Local directory backend.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use spark_model::manifest::MANIFEST_PATH;
use spark_model::{Manifest, parse_device_file, parse_manifest};

use crate::error::{Result, SourceError};
use crate::source::{
    ConcurrencyToken, FetchedCollection, PublishRequest, Published, Source, SourceKind,
};

/// Reads and writes the library in a local checkout.
///
/// The concurrency token is the relative path; no conflict detection is done.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the library.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    async fn read(&self, path: &str) -> Result<String> {
        let full = self.resolve(path);
        tracing::debug!("Reading {}", full.display());
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| SourceError::io("read", path, &e))
    }
}

#[async_trait]
impl Source for LocalSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Local
    }

    async fn fetch_index(&self) -> Result<Manifest> {
        let text = self.read(MANIFEST_PATH).await?;
        parse_manifest(&text).map_err(|e| SourceError::parse(MANIFEST_PATH, &e))
    }

    async fn fetch_collection(&self, path: &str) -> Result<FetchedCollection> {
        let text = self.read(path).await?;
        let file = parse_device_file(&text).map_err(|e| SourceError::parse(path, &e))?;
        Ok(FetchedCollection {
            file,
            token: ConcurrencyToken::new(path),
        })
    }

    fn can_write(&self) -> bool {
        true
    }

    async fn publish(&self, request: &PublishRequest) -> Result<Published> {
        let root = self.root.clone();
        let changes: Vec<(String, String)> = request
            .changes
            .iter()
            .map(|(path, change)| (path.clone(), change.content.clone()))
            .collect();

        let count = tokio::task::spawn_blocking(move || {
            for (path, content) in &changes {
                write_atomic(&root, path, content)?;
            }
            Ok::<_, SourceError>(changes.len())
        })
        .await
        .map_err(|e| SourceError::transport("write task failed", e))??;

        tracing::info!("Saved {} file(s) to {}", count, self.root.display());
        Ok(Published::Saved { count })
    }
}

/// Write one file via a temp file and rename.
fn write_atomic(root: &Path, path: &str, content: &str) -> Result<()> {
    let target = root.join(path);
    let temp_path = target.with_extension("yaml.tmp");

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| SourceError::io("create directory for", path, &e))?;
    }

    let mut file = File::create(&temp_path).map_err(|e| SourceError::io("write", path, &e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| SourceError::io("write", path, &e))?;
    file.sync_all()
        .map_err(|e| SourceError::io("sync", path, &e))?;

    fs::rename(&temp_path, &target).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SourceError::io("replace", path, &e)
    })?;

    tracing::debug!("Wrote {}", target.display());
    Ok(())
}
