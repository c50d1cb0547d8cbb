use anyhow::{Context, Result};
use dataup_core::{DataupConfig, DataupConfigSnapshot, NetworkOrigin};

pub const ENV_PREFIX: &str = "DATAUP__";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STORAGE_ROOT: &str = "data";
pub const DEFAULT_MAX_BLOB_BYTES: u64 = 5 * 1024 * 1024 * 1024;

/// Seed every key the server reads.
pub fn apply_defaults(config: &mut DataupConfig) {
    config.set_default("http.host", DEFAULT_HOST);
    config.set_default("http.port", DEFAULT_PORT.to_string());
    config.set_default("storage.root", DEFAULT_STORAGE_ROOT);
    config.set_default("blob.max_bytes", DEFAULT_MAX_BLOB_BYTES.to_string());
}

/// Environment overrides on top of the defaults.
pub fn load() -> DataupConfig {
    let mut config = DataupConfig::new();
    config.load_env(ENV_PREFIX);
    apply_defaults(&mut config);
    config
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Host put into `dataUrl` when a request carries no `Host` header.
    /// `http.public_host`, defaulting to `http.host`.
    pub public_host: String,
    pub storage_root: String,
    pub max_blob_bytes: u64,
}

impl ServerSettings {
    pub fn from_snapshot(snap: &DataupConfigSnapshot) -> Result<Self> {
        let host = snap
            .get_string("http.host")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(snap, "http.port", DEFAULT_PORT)?;
        let public_host = snap
            .get_string("http.public_host")
            .unwrap_or_else(|| host.clone());
        let storage_root = snap
            .get_string("storage.root")
            .unwrap_or_else(|| DEFAULT_STORAGE_ROOT.to_string());
        let max_blob_bytes = parse_or(snap, "blob.max_bytes", DEFAULT_MAX_BLOB_BYTES)?;

        Ok(Self {
            host,
            port,
            public_host,
            storage_root,
            max_blob_bytes,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn public_origin(&self) -> NetworkOrigin {
        NetworkOrigin::new(self.public_host.clone(), self.port)
    }
}

fn parse_or<T>(snap: &DataupConfigSnapshot, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match snap.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value {raw:?} for config key {key}")),
        None => Ok(default),
    }
}
