use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::{DataupError, DataupResult};
use crate::{VideoId, VideoRecord, UNSET_VIDEO_ID};

/// Storage for video records and the identifier counter.
///
/// The registry only talks to this trait, so a durable backend can replace
/// the in-memory one without touching orchestration.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn get(&self, id: VideoId) -> DataupResult<Option<VideoRecord>>;

    /// Insert or overwrite the record keyed by `record.id`.
    async fn put(&self, record: VideoRecord) -> DataupResult<VideoRecord>;

    /// Store `record` under a freshly assigned id.
    ///
    /// Assigned ids only ever grow and skip any id already holding a record,
    /// so a client-chosen id is never handed out again. Ids a client picks do
    /// not move the counter. `prepare` runs once the id is set and before
    /// the record becomes visible.
    async fn insert_new(
        &self,
        record: VideoRecord,
        prepare: &(dyn for<'r> Fn(&'r mut VideoRecord) + Send + Sync),
    ) -> DataupResult<VideoRecord>;

    /// Point-in-time snapshot of every record.
    async fn list(&self) -> DataupResult<Vec<VideoRecord>>;

    async fn contains(&self, id: VideoId) -> DataupResult<bool>;
}

#[derive(Debug)]
struct Records {
    by_id: BTreeMap<VideoId, VideoRecord>,
    last_assigned: VideoId,
}

/// In-memory record store for a single process.
#[derive(Debug)]
pub struct MemoryVideoStore {
    records: RwLock<Records>,
}

impl MemoryVideoStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Records {
                by_id: BTreeMap::new(),
                last_assigned: UNSET_VIDEO_ID,
            }),
        }
    }
}

impl Default for MemoryVideoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn get(&self, id: VideoId) -> DataupResult<Option<VideoRecord>> {
        Ok(self.records.read().by_id.get(&id).cloned())
    }

    async fn put(&self, record: VideoRecord) -> DataupResult<VideoRecord> {
        self.records.write().by_id.insert(record.id, record.clone());
        Ok(record)
    }

    async fn insert_new(
        &self,
        mut record: VideoRecord,
        prepare: &(dyn for<'r> Fn(&'r mut VideoRecord) + Send + Sync),
    ) -> DataupResult<VideoRecord> {
        let mut records = self.records.write();
        loop {
            let id = records.last_assigned.checked_add(1).ok_or_else(|| {
                DataupError::general_error("Video identifiers exhausted").into_anyhow()
            })?;
            records.last_assigned = id;
            if !records.by_id.contains_key(&id) {
                record.id = id;
                prepare(&mut record);
                records.by_id.insert(id, record.clone());
                return Ok(record);
            }
        }
    }

    async fn list(&self) -> DataupResult<Vec<VideoRecord>> {
        Ok(self.records.read().by_id.values().cloned().collect())
    }

    async fn contains(&self, id: VideoId) -> DataupResult<bool> {
        Ok(self.records.read().by_id.contains_key(&id))
    }
}
