use serde::{Deserialize, Serialize};

use crate::{BlobId, ByteStream};

/// Handle to a payload whose upload completed.
///
/// A store only hands these out after the whole stream was persisted, so
/// holding one means the bytes behind `key` are complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobHandle {
    pub id: BlobId,
    pub key: String,
    pub size_bytes: u64,
    pub stored_at: i64,
}

impl BlobHandle {
    pub fn new(id: BlobId, key: String, size_bytes: u64) -> Self {
        Self {
            id,
            key,
            size_bytes,
            stored_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Result of opening a blob for reading
pub struct OpenedBlob {
    pub handle: BlobHandle,
    pub stream: ByteStream,
}

impl OpenedBlob {
    pub fn new(handle: BlobHandle, stream: ByteStream) -> Self {
        Self { handle, stream }
    }

    pub fn content_length(&self) -> u64 {
        self.handle.size_bytes
    }
}

impl std::fmt::Debug for OpenedBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenedBlob")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
