use dataup_core::{NetworkOrigin, VideoService};

/// Shared by every handler.
#[derive(Clone)]
pub struct DataupAxumState {
    pub service: VideoService,
    /// Used to build `dataUrl` when a request does not say how it reached us
    pub origin: NetworkOrigin,
}

impl DataupAxumState {
    pub fn new(service: VideoService, origin: NetworkOrigin) -> Self {
        Self { service, origin }
    }
}
