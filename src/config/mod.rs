pub mod defaults;
pub mod loader;

pub use defaults::*;
pub use loader::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub separator: Option<String>,
    #[serde(default)]
    pub segments: SegmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub fossil: Option<FossilConfig>,
    pub nightscout: Option<NightscoutConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FossilConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Executable to probe; defaults to `fossil`.
    pub command: Option<String>,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightscoutConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Full entries endpoint, query string included.
    pub url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    /// Milliseconds.
    #[serde(rename = "httpTimeout")]
    pub http_timeout: Option<u64>,
    pub template: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}
