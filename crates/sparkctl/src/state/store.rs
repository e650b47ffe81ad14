//! Change tracking for loaded vendor files.
//!
//! Every loaded file keeps the fetched copy and a working copy. Edits only
//! touch the working copy; a file is dirty once any mutation on it has
//! succeeded since it was loaded, reverted or published.

use std::collections::BTreeMap;

use spark_model::DeviceFile;
use spark_source::ConcurrencyToken;

/// One loaded vendor file.
#[derive(Debug, Clone)]
pub struct FileState {
    path: String,
    token: ConcurrencyToken,
    original: DeviceFile,
    working: DeviceFile,
    dirty: bool,
}

impl FileState {
    fn new(path: String, file: DeviceFile, token: ConcurrencyToken) -> Self {
        let working = file.clone();
        Self {
            path,
            token,
            original: file,
            working,
            dirty: false,
        }
    }

    /// Storage path relative to the library root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Token captured when the file was fetched.
    pub fn token(&self) -> &ConcurrencyToken {
        &self.token
    }

    /// The file as fetched.
    pub fn original(&self) -> &DeviceFile {
        &self.original
    }

    /// The edited file.
    pub fn working(&self) -> &DeviceFile {
        &self.working
    }

    /// Whether the working copy has unpublished mutations.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// All loaded files keyed by path.
#[derive(Debug, Default)]
pub struct ChangeStore {
    files: BTreeMap<String, FileState>,
}

impl ChangeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly fetched file. Replaces any previous state for `path`.
    pub fn load(&mut self, path: impl Into<String>, file: DeviceFile, token: ConcurrencyToken) {
        let path = path.into();
        tracing::debug!("Tracking {} ({} device types)", path, file.len());
        self.files
            .insert(path.clone(), FileState::new(path, file, token));
    }

    /// Whether `path` has been loaded.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&FileState> {
        self.files.get(path)
    }

    /// Working copy of `path`.
    pub fn working(&self, path: &str) -> Option<&DeviceFile> {
        self.files.get(path).map(FileState::working)
    }

    /// Run a mutation on the working copy of `path`.
    ///
    /// The file is marked dirty only when `f` returns `Ok`. `None` means the
    /// path is not loaded.
    pub fn modify<T, E>(
        &mut self,
        path: &str,
        f: impl FnOnce(&mut DeviceFile) -> Result<T, E>,
    ) -> Option<Result<T, E>> {
        let state = self.files.get_mut(path)?;
        let result = f(&mut state.working);
        if result.is_ok() {
            state.dirty = true;
        }
        Some(result)
    }

    /// Flag `path` as changed.
    pub fn mark_dirty(&mut self, path: &str) {
        if let Some(state) = self.files.get_mut(path) {
            state.dirty = true;
        }
    }

    /// Files with unpublished changes, in path order.
    pub fn dirty_files(&self) -> Vec<&FileState> {
        self.files.values().filter(|f| f.dirty).collect()
    }

    /// Number of files with unpublished changes.
    pub fn dirty_count(&self) -> usize {
        self.files.values().filter(|f| f.dirty).count()
    }

    /// Whether any file has unpublished changes.
    pub fn has_changes(&self) -> bool {
        self.files.values().any(FileState::is_dirty)
    }

    /// Clear the dirty flag of every listed path.
    pub fn clear_dirty<'a>(&mut self, paths: impl IntoIterator<Item = &'a str>) {
        for path in paths {
            if let Some(state) = self.files.get_mut(path) {
                state.dirty = false;
            }
        }
    }

    /// Discard all edits to `path`. Returns false when it is not loaded.
    pub fn revert(&mut self, path: &str) -> bool {
        match self.files.get_mut(path) {
            Some(state) => {
                state.working = state.original.clone();
                state.dirty = false;
                tracing::info!("Reverted {}", path);
                true
            }
            None => false,
        }
    }
}
