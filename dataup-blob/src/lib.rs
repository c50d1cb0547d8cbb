//! # dataup-blob: payload storage for dataup
//!
//! Stores one binary payload per video id and hands back a [`BlobHandle`]
//! once the payload is complete.
//!
//! - **Streaming-first**: payloads are consumed chunk by chunk, never buffered whole
//!   (the in-memory store excepted)
//! - **No partial overwrite**: uploads are staged and promoted only after the
//!   last byte is written, so a broken transfer leaves the previous payload intact
//! - **Storage agnostic**: [`BlobStore`] is the seam, with filesystem and memory
//!   implementations provided
//!
//! ```rust
//! use dataup_blob::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let dir = tempfile::tempdir()?;
//! let store = FsBlobStore::new(dir.path(), BlobConfig::default()).await?;
//!
//! let handle = store.put(BlobId::new(1), bytes_stream(&b"hello"[..])).await?;
//! assert_eq!(handle.size_bytes, 5);
//!
//! let opened = store.open(&handle).await?;
//! assert_eq!(opened.content_length(), 5);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod fs_store;
mod handle;
mod memory_store;
pub mod store;
mod types;

pub use config::BlobConfig;
pub use error::{BlobError, BlobResult};
pub use fs_store::FsBlobStore;
pub use handle::{BlobHandle, OpenedBlob};
pub use memory_store::MemoryBlobStore;
pub use store::{BlobKeyStrategy, BlobStore, DefaultKeyStrategy};
pub use types::{bytes_stream, BlobId, ByteStream};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        bytes_stream, BlobConfig, BlobError, BlobHandle, BlobId, BlobResult, BlobStore,
        ByteStream, FsBlobStore, MemoryBlobStore, OpenedBlob,
    };
}
