use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::{
    BlobConfig, BlobError, BlobHandle, BlobId, BlobKeyStrategy, BlobResult, BlobStore,
    ByteStream, DefaultKeyStrategy, OpenedBlob,
};

/// Local filesystem blob store.
///
/// Payloads land under `root` at the path given by the key strategy
/// (`{root}/{id}/video.mpeg` by default). Uploads are written to a staging
/// file next to the target and renamed into place once complete. Concurrent
/// uploads for one id stream in parallel, but their rename and handle update
/// happen one at a time, so the handle always describes the file on disk.
pub struct FsBlobStore {
    root: PathBuf,
    keys: Arc<dyn BlobKeyStrategy>,
    config: BlobConfig,
    handles: DashMap<BlobId, BlobHandle>,
    promote_locks: DashMap<BlobId, Arc<Mutex<()>>>,
}

impl FsBlobStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub async fn new(root: impl Into<PathBuf>, config: BlobConfig) -> BlobResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;

        tracing::debug!(root = %root.display(), "Filesystem blob store ready");

        Ok(Self {
            root,
            keys: Arc::new(DefaultKeyStrategy),
            handles: DashMap::new(),
            promote_locks: DashMap::new(),
            config,
        })
    }

    /// Use a custom key strategy
    pub fn with_key_strategy<K: BlobKeyStrategy + 'static>(mut self, keys: K) -> Self {
        self.keys = Arc::new(keys);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    /// Resolve a key below the root; keys may not climb out of it
    fn key_to_path(&self, key: &str) -> BlobResult<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(BlobError::invalid(format!("Invalid storage key: {}", key)));
        }
        Ok(self.root.join(relative))
    }

    async fn write_staged(
        &self,
        id: BlobId,
        path: &Path,
        mut stream: ByteStream,
    ) -> BlobResult<u64> {
        let mut file = fs::File::create(path).await?;
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| BlobError::stream(id, e))?;
            written += chunk.len() as u64;
            if written > self.config.max_blob_bytes {
                return Err(BlobError::too_large(id, self.config.max_blob_bytes));
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        if self.config.sync_on_write {
            file.sync_all().await?;
        }

        Ok(written)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, id: BlobId, stream: ByteStream) -> BlobResult<BlobHandle> {
        let key = self.keys.object_key(id);
        let path = self.key_to_path(&key)?;
        let nonce = Uuid::new_v4().simple().to_string();
        let staging = self.key_to_path(&self.keys.staging_key(id, &nonce))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let start = Instant::now();

        let written = match self.write_staged(id, &staging, stream).await {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&staging).await;
                tracing::warn!(id = %id, key = %key, error = %e, "Blob upload aborted");
                return Err(e);
            }
        };

        let lock = self.promote_locks.entry(id).or_default().clone();
        let handle = {
            let _promoting = lock.lock().await;
            if let Err(e) = fs::rename(&staging, &path).await {
                let _ = fs::remove_file(&staging).await;
                return Err(e.into());
            }
            let handle = BlobHandle::new(id, key, written);
            self.handles.insert(id, handle.clone());
            handle
        };

        tracing::info!(
            id = %id,
            path = %path.display(),
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob stored"
        );

        Ok(handle)
    }

    async fn get(&self, id: BlobId) -> BlobResult<Option<BlobHandle>> {
        Ok(self.handles.get(&id).map(|h| h.value().clone()))
    }

    async fn open(&self, handle: &BlobHandle) -> BlobResult<OpenedBlob> {
        let path = self.key_to_path(&handle.key)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BlobError::not_found(handle.id));
            }
            Err(e) => return Err(e.into()),
        };

        // the open file pins one payload; a later replace renames a new
        // inode over the path without touching it
        let mut opened = handle.clone();
        opened.size_bytes = file.metadata().await?.len();

        tracing::debug!(
            id = %handle.id,
            path = %path.display(),
            size_bytes = opened.size_bytes,
            "Blob opened"
        );

        Ok(OpenedBlob::new(opened, Box::pin(ReaderStream::new(file))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keys_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), BlobConfig::default()).await.unwrap();

        assert!(store.key_to_path("1/video.mpeg").is_ok());
        assert!(matches!(
            store.key_to_path("../etc/passwd"),
            Err(BlobError::Invalid { .. })
        ));
        assert!(matches!(
            store.key_to_path("/etc/passwd"),
            Err(BlobError::Invalid { .. })
        ));
        assert!(matches!(store.key_to_path(""), Err(BlobError::Invalid { .. })));
    }

    #[tokio::test]
    async fn new_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");

        let store = FsBlobStore::new(&root, BlobConfig::default()).await.unwrap();

        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }
}
