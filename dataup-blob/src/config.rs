/// Configuration for blob stores
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Absolute max size allowed for a single blob (safety guard)
    pub max_blob_bytes: u64,

    /// fsync the payload before it becomes visible
    pub sync_on_write: bool,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            max_blob_bytes: 5 * 1024 * 1024 * 1024, // 5GB
            sync_on_write: true,
        }
    }
}

impl BlobConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max blob size
    pub fn with_max_blob_bytes(mut self, bytes: u64) -> Self {
        self.max_blob_bytes = bytes;
        self
    }

    /// Skip fsync (tests, throwaway storage)
    pub fn without_sync(mut self) -> Self {
        self.sync_on_write = false;
        self
    }
}
