use serde::{Deserialize, Serialize};

/// Identifier of a video record, its status entry and its payload.
pub type VideoId = i64;

/// Sentinel meaning "assign me an id" on save.
pub const UNSET_VIDEO_ID: VideoId = 0;

/// Smallest id the registry ever assigns.
pub const MIN_VIDEO_ID: VideoId = 1;

/// Metadata describing a video.
///
/// Descriptive fields are opaque to the service and stored as given.
/// `data_url` is derived on every save; whatever a client sends is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoRecord {
    pub id: VideoId,
    pub title: Option<String>,
    pub duration: i64,
    pub location: Option<String>,
    pub subject: Option<String>,
    pub content_type: Option<String>,
    pub data_url: Option<String>,
}

impl VideoRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: VideoId) -> Self {
        self.id = id;
        self
    }

    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_unset(&self) -> bool {
        self.id == UNSET_VIDEO_ID
    }
}

/// Where the caller reached us, used to build absolute retrieval URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkOrigin {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl NetworkOrigin {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: "http".to_string(),
            host: host.into(),
            port,
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// `scheme://host:port/video/{id}/data`
    pub fn data_url(&self, id: VideoId) -> String {
        format!("{}/video/{}/data", self, id)
    }
}

impl std::fmt::Display for NetworkOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}
