//! dataup-core: video registry, upload status tracking and the
//! upload/download flow that ties them to a blob store.
//!
//! Transport-agnostic. HTTP lives in `dataup-axum`.

pub mod config;
pub mod errors;
pub mod registry;
pub mod service;
pub mod status;
pub mod store;
pub mod video;

pub use config::{DataupConfig, DataupConfigSnapshot};
pub use errors::{DataupError, DataupResult, ErrorKind};
pub use registry::VideoRegistry;
pub use service::{VideoDownload, VideoService};
pub use status::{StatusTracker, VideoState, VideoStatus};
pub use store::{MemoryVideoStore, VideoStore};
pub use video::{NetworkOrigin, VideoId, VideoRecord, MIN_VIDEO_ID, UNSET_VIDEO_ID};
