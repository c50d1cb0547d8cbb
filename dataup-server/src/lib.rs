pub mod config;

use anyhow::Result;
use dataup_axum::{axum, AxumApp, DataupAxumState};
use dataup_blob::{BlobConfig, FsBlobStore};
use dataup_core::{DataupConfig, VideoRegistry, VideoService};

pub use config::ServerSettings;

/// Wire the filesystem blob store, the in-memory registry and the HTTP routes.
pub async fn build(config: &DataupConfig) -> Result<AxumApp> {
    let settings = ServerSettings::from_snapshot(&config.snapshot())?;

    let blob_config = BlobConfig::new().with_max_blob_bytes(settings.max_blob_bytes);
    let blobs = FsBlobStore::new(&settings.storage_root, blob_config).await?;
    tracing::info!(
        root = %settings.storage_root,
        max_bytes = settings.max_blob_bytes,
        "Blob storage ready"
    );

    let service = VideoService::new(VideoRegistry::in_memory(), blobs);
    let origin = settings.public_origin();

    Ok(axum(DataupAxumState::new(service, origin)))
}
