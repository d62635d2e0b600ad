use std::{path::Path, time::Duration};

use anyhow::Context;
use config::{Config, Environment, File};
use portal_api::UploadPolicy;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "portal.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_addr: String,
    pub log_filter: String,
    pub submit_latency_ms: u64,
    pub lookup_latency_ms: u64,
    /// Start with the three demo reports and four activities.
    pub seed_sample_data: bool,
    pub max_body_bytes: usize,
    pub uploads: UploadPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            log_filter: "info".into(),
            submit_latency_ms: 1500,
            lookup_latency_ms: 1000,
            seed_sample_data: true,
            max_body_bytes: 64 * 1024,
            uploads: UploadPolicy::default(),
        }
    }
}

impl Settings {
    pub fn submit_latency(&self) -> Duration {
        Duration::from_millis(self.submit_latency_ms)
    }

    pub fn lookup_latency(&self) -> Duration {
        Duration::from_millis(self.lookup_latency_ms)
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Defaults, then the optional TOML file, then `APP__*` variables.
pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("failed to read settings from '{}'", path.display()))?
        .try_deserialize::<Settings>()
        .context("invalid portal settings")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
