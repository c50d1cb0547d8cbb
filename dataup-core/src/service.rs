use std::sync::Arc;

use dataup_blob::{BlobError, BlobId, BlobStore, ByteStream, MemoryBlobStore, OpenedBlob};

use crate::bail_dataup;
use crate::errors::{DataupError, DataupResult};
use crate::{NetworkOrigin, StatusTracker, VideoId, VideoRecord, VideoRegistry, VideoStatus};

/// A payload ready to be streamed back to a client.
#[derive(Debug)]
pub struct VideoDownload {
    pub id: VideoId,
    pub content_type: Option<String>,
    pub blob: OpenedBlob,
}

impl VideoDownload {
    pub fn content_length(&self) -> u64 {
        self.blob.content_length()
    }
}

/// Coordinates metadata, upload status and payload storage.
///
/// The three stores are owned independently; the only ordering enforced is
/// inside an upload: the record must exist, PROCESSING is recorded before
/// any byte is written, and READY only after the blob store confirms the
/// payload is complete.
#[derive(Clone)]
pub struct VideoService {
    registry: VideoRegistry,
    statuses: Arc<StatusTracker>,
    blobs: Arc<dyn BlobStore>,
}

impl VideoService {
    pub fn new<B: BlobStore + 'static>(registry: VideoRegistry, blobs: B) -> Self {
        Self::from_parts(registry, Arc::new(StatusTracker::new()), Arc::new(blobs))
    }

    pub fn from_parts(
        registry: VideoRegistry,
        statuses: Arc<StatusTracker>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            registry,
            statuses,
            blobs,
        }
    }

    /// Everything in memory, for tests and local tinkering.
    pub fn in_memory() -> Self {
        Self::new(VideoRegistry::in_memory(), MemoryBlobStore::new())
    }

    pub fn registry(&self) -> &VideoRegistry {
        &self.registry
    }

    pub fn statuses(&self) -> &StatusTracker {
        &self.statuses
    }

    pub async fn list(&self) -> DataupResult<Vec<VideoRecord>> {
        self.registry.list_videos().await
    }

    pub async fn save(
        &self,
        record: VideoRecord,
        origin: &NetworkOrigin,
    ) -> DataupResult<VideoRecord> {
        self.registry.save_video(record, origin).await
    }

    /// Persist the payload for a registered video.
    ///
    /// Unknown ids are rejected before the status tracker or blob store is
    /// touched. The error from a failed transfer propagates and nothing is
    /// retried. Status ends at FAILED, or back at READY when an earlier
    /// payload is still in place.
    pub async fn upload(&self, id: VideoId, stream: ByteStream) -> DataupResult<VideoStatus> {
        if !self.registry.exists(id).await? {
            bail_dataup!(not_found, "Video {} not found", id);
        }

        self.statuses.begin(id);
        tracing::info!(id, "Upload started");

        match self.blobs.put(BlobId::new(id), stream).await {
            Ok(handle) => {
                let status = self.statuses.complete(id);
                tracing::info!(id, size_bytes = handle.size_bytes, "Upload complete");
                Ok(status)
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Upload failed");
                // an earlier payload survives a failed replace and stays downloadable
                match self.blobs.get(BlobId::new(id)).await {
                    Ok(Some(_)) => {
                        self.statuses.complete(id);
                    }
                    _ => {
                        self.statuses.fail(id, e.to_string());
                    }
                }
                Err(blob_error(e))
            }
        }
    }

    /// Open the completed payload for `id`.
    pub async fn download(&self, id: VideoId) -> DataupResult<VideoDownload> {
        let handle = self
            .blobs
            .get(BlobId::new(id))
            .await
            .map_err(blob_error)?
            .ok_or_else(|| {
                DataupError::not_found(format!("No data uploaded for video {}", id)).into_anyhow()
            })?;

        let blob = self.blobs.open(&handle).await.map_err(blob_error)?;
        let content_type = self
            .registry
            .get(id)
            .await?
            .and_then(|record| record.content_type);

        tracing::debug!(id, size_bytes = handle.size_bytes, "Download opened");

        Ok(VideoDownload {
            id,
            content_type,
            blob,
        })
    }

    pub async fn status(&self, id: VideoId) -> DataupResult<VideoStatus> {
        let Some(status) = self.statuses.get(id) else {
            bail_dataup!(not_found, "No upload recorded for video {}", id);
        };
        Ok(status)
    }
}

fn blob_error(err: BlobError) -> anyhow::Error {
    DataupError::from(err).into_anyhow()
}
