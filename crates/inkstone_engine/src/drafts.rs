use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use futures_util::future::try_join_all;
use inkstone_core::{Draft, DraftId};
use inkstone_logging::{ink_debug, ink_warn};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};

use crate::filename::draft_filename;

/// Sub-directory holding drafts, kept apart from any other application data.
pub const DEFAULT_NAMESPACE: &str = "drafts";

#[derive(Debug, Error)]
pub enum StoreError {
    /// The host cannot keep drafts at all; listing continues without them.
    #[error("draft storage unavailable: {0}")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode draft: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable per-device store of unpublished drafts, keyed by draft id.
///
/// Every operation initializes the store first. Writes are atomic per key and
/// the last writer wins; nothing is ordered across different ids.
#[async_trait::async_trait]
pub trait DraftStore: Send + Sync {
    /// Opens the store, creating it if absent. Idempotent.
    async fn initialize(&self) -> Result<(), StoreError>;

    /// All stored drafts; empty if nothing was ever saved.
    async fn get_all(&self) -> Result<Vec<Draft>, StoreError>;

    /// Inserts or overwrites the draft with the same id.
    async fn save(&self, draft: &Draft) -> Result<(), StoreError>;

    /// Removes a draft; an unknown id is not an error.
    async fn delete(&self, id: &DraftId) -> Result<(), StoreError>;
}

/// Drafts as one JSON file each under `{root}/{namespace}`.
#[derive(Debug)]
pub struct FileDraftStore {
    dir: PathBuf,
    ready: OnceCell<()>,
}

impl FileDraftStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_namespace(root, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(root: impl Into<PathBuf>, namespace: &str) -> Self {
        Self {
            dir: root.into().join(namespace),
            ready: OnceCell::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &DraftId) -> PathBuf {
        self.dir.join(draft_filename(id))
    }
}

#[async_trait::async_trait]
impl DraftStore for FileDraftStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        self.ready
            .get_or_try_init(|| async {
                let dir = self.dir.clone();
                tokio::task::spawn_blocking(move || open_draft_dir(&dir))
                    .await
                    .map_err(|err| StoreError::Unavailable(err.to_string()))??;
                ink_debug!("Draft store ready at {:?}", self.dir);
                Ok::<(), StoreError>(())
            })
            .await?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Draft>, StoreError> {
        self.initialize().await?;

        let mut paths = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                paths.push(path);
            }
        }

        let loaded = try_join_all(paths.into_iter().map(read_draft)).await?;
        let mut drafts: Vec<Draft> = loaded.into_iter().flatten().collect();
        drafts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(drafts)
    }

    async fn save(&self, draft: &Draft) -> Result<(), StoreError> {
        self.initialize().await?;

        let content = serde_json::to_vec_pretty(draft)?;
        let filename = draft_filename(&draft.id);
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || write_draft_file(&dir, &filename, &content))
            .await
            .map_err(|err| StoreError::Io(io::Error::other(err)))??;
        Ok(())
    }

    async fn delete(&self, id: &DraftId) -> Result<(), StoreError> {
        self.initialize().await?;

        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Creates the draft directory if needed and checks a draft could be written there.
fn open_draft_dir(dir: &Path) -> Result<(), StoreError> {
    let unavailable = |err: io::Error| StoreError::Unavailable(format!("{}: {err}", dir.display()));
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(StoreError::Unavailable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(unavailable)?;
        }
        Err(err) => return Err(unavailable(err)),
    }
    NamedTempFile::new_in(dir).map_err(unavailable)?;
    Ok(())
}

/// Replaces one draft file in a single rename, so `get_all` never sees half a draft.
fn write_draft_file(dir: &Path, filename: &str, content: &[u8]) -> Result<(), StoreError> {
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(content)?;
    staged.as_file_mut().sync_all()?;
    staged
        .persist(dir.join(filename))
        .map_err(|err| StoreError::Io(err.error))?;
    Ok(())
}

/// Unreadable files fail the listing; files that do not parse are skipped.
async fn read_draft(path: PathBuf) -> Result<Option<Draft>, StoreError> {
    let content = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        // Deleted between listing and reading.
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    match serde_json::from_slice::<Draft>(&content) {
        Ok(draft) => Ok(Some(draft)),
        Err(err) => {
            ink_warn!("Skipping unreadable draft file {:?}: {}", path, err);
            Ok(None)
        }
    }
}

/// Drafts kept in memory for the lifetime of the process.
#[derive(Debug)]
pub struct MemoryDraftStore {
    drafts: Mutex<BTreeMap<DraftId, Draft>>,
    available: bool,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self {
            drafts: Mutex::new(BTreeMap::new()),
            available: true,
        }
    }

    /// A store that behaves like a host without local persistent storage.
    pub fn unavailable() -> Self {
        Self {
            drafts: Mutex::new(BTreeMap::new()),
            available: false,
        }
    }

    pub fn with_drafts(drafts: impl IntoIterator<Item = Draft>) -> Self {
        let map = drafts
            .into_iter()
            .map(|draft| (draft.id.clone(), draft))
            .collect();
        Self {
            drafts: Mutex::new(map),
            available: true,
        }
    }
}

impl Default for MemoryDraftStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DraftStore for MemoryDraftStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "no local persistent storage on this host".to_string(),
            ))
        }
    }

    async fn get_all(&self) -> Result<Vec<Draft>, StoreError> {
        self.initialize().await?;
        Ok(self.drafts.lock().await.values().cloned().collect())
    }

    async fn save(&self, draft: &Draft) -> Result<(), StoreError> {
        self.initialize().await?;
        self.drafts
            .lock()
            .await
            .insert(draft.id.clone(), draft.clone());
        Ok(())
    }

    async fn delete(&self, id: &DraftId) -> Result<(), StoreError> {
        self.initialize().await?;
        self.drafts.lock().await.remove(id);
        Ok(())
    }
}
