use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use dashmap::DashMap;
use futures_util::StreamExt;

use crate::{
    bytes_stream, BlobConfig, BlobError, BlobHandle, BlobId, BlobKeyStrategy, BlobResult,
    BlobStore, ByteStream, DefaultKeyStrategy, OpenedBlob,
};

/// In-memory blob store for testing and development
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<BlobId, (BlobHandle, Bytes)>,
    config: BlobConfig,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BlobConfig) -> Self {
        Self {
            blobs: DashMap::new(),
            config,
        }
    }

    /// Number of completed payloads
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, id: BlobId, mut stream: ByteStream) -> BlobResult<BlobHandle> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| BlobError::stream(id, e))?;
            if (buf.len() + chunk.len()) as u64 > self.config.max_blob_bytes {
                return Err(BlobError::too_large(id, self.config.max_blob_bytes));
            }
            buf.extend_from_slice(&chunk);
        }

        let data = buf.freeze();
        let handle = BlobHandle::new(id, DefaultKeyStrategy.object_key(id), data.len() as u64);
        self.blobs.insert(id, (handle.clone(), data));
        Ok(handle)
    }

    async fn get(&self, id: BlobId) -> BlobResult<Option<BlobHandle>> {
        Ok(self.blobs.get(&id).map(|entry| entry.0.clone()))
    }

    async fn open(&self, handle: &BlobHandle) -> BlobResult<OpenedBlob> {
        let entry = self
            .blobs
            .get(&handle.id)
            .ok_or_else(|| BlobError::not_found(handle.id))?;
        let (stored, data) = entry.value().clone();
        Ok(OpenedBlob::new(stored, bytes_stream(data)))
    }
}
