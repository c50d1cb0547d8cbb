use std::sync::Arc;

use crate::errors::DataupResult;
use crate::store::{MemoryVideoStore, VideoStore};
use crate::{NetworkOrigin, VideoId, VideoRecord, MIN_VIDEO_ID};

/// Owns video metadata and identifier assignment.
#[derive(Clone)]
pub struct VideoRegistry {
    store: Arc<dyn VideoStore>,
}

impl VideoRegistry {
    pub fn new<S: VideoStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<dyn VideoStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryVideoStore::new())
    }

    pub async fn list_videos(&self) -> DataupResult<Vec<VideoRecord>> {
        self.store.list().await
    }

    /// Store `record`, assigning an id if it carries the unset sentinel.
    ///
    /// `data_url` is recomputed from `origin` every time. A record with an
    /// explicit id overwrites whatever is stored under it.
    pub async fn save_video(
        &self,
        mut record: VideoRecord,
        origin: &NetworkOrigin,
    ) -> DataupResult<VideoRecord> {
        let assigned = record.is_unset();
        let saved = if assigned {
            self.store
                .insert_new(record, &|r| r.data_url = Some(origin.data_url(r.id)))
                .await?
        } else {
            record.data_url = Some(origin.data_url(record.id));
            self.store.put(record).await?
        };

        tracing::info!(
            id = saved.id,
            assigned,
            data_url = saved.data_url.as_deref().unwrap_or_default(),
            "Video saved"
        );

        Ok(saved)
    }

    /// Whether uploads for `id` may be accepted.
    pub async fn exists(&self, id: VideoId) -> DataupResult<bool> {
        if id < MIN_VIDEO_ID {
            return Ok(false);
        }
        self.store.contains(id).await
    }

    pub async fn get(&self, id: VideoId) -> DataupResult<Option<VideoRecord>> {
        self.store.get(id).await
    }
}
