use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::VideoId;

/// Processing state of a video's payload.
///
/// No entry at all means no upload was ever attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoState {
    Processing,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStatus {
    pub state: VideoState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VideoStatus {
    pub fn processing() -> Self {
        Self {
            state: VideoState::Processing,
            reason: None,
        }
    }

    pub fn ready() -> Self {
        Self {
            state: VideoState::Ready,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            state: VideoState::Failed,
            reason: Some(reason.into()),
        }
    }
}

/// Upload status per video id.
///
/// Entries are independent of each other; there is no lock across ids.
#[derive(Debug, Default)]
pub struct StatusTracker {
    statuses: DashMap<VideoId, VideoStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// An upload stream for `id` started.
    pub fn begin(&self, id: VideoId) -> VideoStatus {
        self.set(id, VideoStatus::processing())
    }

    /// The payload for `id` is fully persisted.
    pub fn complete(&self, id: VideoId) -> VideoStatus {
        self.set(id, VideoStatus::ready())
    }

    /// The upload for `id` broke off.
    pub fn fail(&self, id: VideoId, reason: impl Into<String>) -> VideoStatus {
        self.set(id, VideoStatus::failed(reason))
    }

    pub fn get(&self, id: VideoId) -> Option<VideoStatus> {
        self.statuses.get(&id).map(|s| s.value().clone())
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    fn set(&self, id: VideoId, status: VideoStatus) -> VideoStatus {
        tracing::debug!(id, state = ?status.state, "Upload status changed");
        self.statuses.insert(id, status.clone());
        status
    }
}
