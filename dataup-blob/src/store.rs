use async_trait::async_trait;

use crate::{BlobHandle, BlobId, BlobResult, ByteStream, OpenedBlob};

/// Core blob storage operations - must be implemented by all storage backends
///
/// Stores do not know about video metadata. Callers check that the id is
/// registered before calling `put`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Consume `stream` fully and persist it as the payload for `id`.
    ///
    /// Replaces any earlier payload for `id` only once the new one is
    /// complete. A failed transfer leaves the previous state untouched.
    async fn put(&self, id: BlobId, stream: ByteStream) -> BlobResult<BlobHandle>;

    /// Handle for `id` if, and only if, a `put` for it completed
    async fn get(&self, id: BlobId) -> BlobResult<Option<BlobHandle>>;

    /// Open a completed payload for reading
    async fn open(&self, handle: &BlobHandle) -> BlobResult<OpenedBlob>;
}

/// Strategy for generating blob keys
pub trait BlobKeyStrategy: Send + Sync {
    /// Key the completed payload for `id` lives under
    fn object_key(&self, id: BlobId) -> String;

    /// Key for an in-flight upload. Must share a directory with `object_key`
    /// so promoting it is a rename.
    fn staging_key(&self, id: BlobId, nonce: &str) -> String;
}

/// Default key strategy: `{id}/video.mpeg`
#[derive(Debug, Clone)]
pub struct DefaultKeyStrategy;

impl BlobKeyStrategy for DefaultKeyStrategy {
    fn object_key(&self, id: BlobId) -> String {
        format!("{}/video.mpeg", id)
    }

    fn staging_key(&self, id: BlobId, nonce: &str) -> String {
        format!("{}/.video.mpeg.{}.part", id, nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keys_share_a_directory() {
        let keys = DefaultKeyStrategy;
        let id = BlobId::new(7);

        assert_eq!(keys.object_key(id), "7/video.mpeg");

        let staging = keys.staging_key(id, "abc");
        assert_eq!(staging, "7/.video.mpeg.abc.part");
        assert_eq!(
            std::path::Path::new(&staging).parent(),
            std::path::Path::new(&keys.object_key(id)).parent()
        );
    }
}
