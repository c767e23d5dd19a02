//! Node configuration, loaded from a YAML file and overridable by CLI args
//! and environment variables (see `main.rs`).

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,

    /// Base URL of a remote blob store, e.g. `http://blockstore:8080`. If
    /// unset, an in-memory store is used (data does not persist).
    pub blockstore_url: Option<String>,

    /// Base URL of the external quota authority. If unset, `default_quota`
    /// is granted to every space unconditionally.
    pub quota_authority_url: Option<String>,
    /// Fallback/default per-space byte quota used when no authority is
    /// configured.
    pub default_quota_bytes: u64,
    /// How long a fetched quota limit stays cached before being re-fetched.
    pub quota_cache_ttl_secs: u64,

    /// `file_id` that bypasses space binding and quota checks.
    pub migration_file_id: String,

    /// HMAC secret used to validate bearer JWTs. Required unless
    /// `auth_enabled` is false.
    pub jwt_secret: Option<String>,
    /// Whether incoming requests must carry a valid bearer token.
    pub auth_enabled: bool,

    /// Maximum accepted request body size, in bytes.
    pub max_body_size: usize,

    pub cors_enabled: bool,
    pub cors_origins: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7700,
            blockstore_url: None,
            quota_authority_url: None,
            default_quota_bytes: 10 * 1024 * 1024 * 1024, // 10 GiB
            quota_cache_ttl_secs: 300,
            migration_file_id: filenode_core::MIGRATION_FILE_ID.to_string(),
            jwt_secret: None,
            auth_enabled: true,
            max_body_size: 512 * 1024 * 1024, // 512 MiB
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl NodeConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse a `NodeConfig` from YAML.
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Load and parse a YAML config file from disk.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&contents)?)
    }
}
