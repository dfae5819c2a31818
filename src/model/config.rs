use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration from taskdeck.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Simulated round-trip for every store operation
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Simulated delay of the mock login
    #[serde(default = "default_auth_latency_ms")]
    pub auth_latency_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            latency_ms: default_latency_ms(),
            auth_latency_ms: default_auth_latency_ms(),
        }
    }
}

fn default_latency_ms() -> u64 {
    500
}

fn default_auth_latency_ms() -> u64 {
    1000
}

/// Overrides for the bundled mock data. Relative paths resolve against the
/// directory holding taskdeck.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub projects: Option<PathBuf>,
    #[serde(default)]
    pub tasks: Option<PathBuf>,
}
