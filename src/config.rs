//! Runtime settings
//!
//! Settings come from an optional JSON file named by `TUNEDECK_CONFIG`;
//! missing fields keep their defaults. `TUNEDECK_LOG_DIR` and
//! `TUNEDECK_LIBRARY` override single fields without a file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_ENV: &str = "TUNEDECK_CONFIG";
pub const LOG_DIR_ENV: &str = "TUNEDECK_LOG_DIR";
pub const LIBRARY_ENV: &str = "TUNEDECK_LIBRARY";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_dir: PathBuf,
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
    /// JSON file the demo library is seeded from
    pub library_path: Option<PathBuf>,
    /// Start the next song of the same list when one ends
    pub auto_advance: bool,
    pub notice_timeout_secs: u64,
    pub search_limit: usize,
    /// Delay the demo backend adds to every operation
    pub simulated_latency_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(".logs"),
            log_filter: None,
            library_path: None,
            auto_advance: true,
            notice_timeout_secs: 5,
            search_limit: 40,
            simulated_latency_ms: 150,
        }
    }
}

impl Settings {
    /// Load from the environment: config file first, then single-field overrides.
    pub fn load() -> Result<Self> {
        let mut settings = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(dir) = std::env::var_os(LOG_DIR_ENV) {
            settings.log_dir = PathBuf::from(dir);
        }
        if let Some(path) = std::env::var_os(LIBRARY_ENV) {
            settings.library_path = Some(PathBuf::from(path));
        }
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn notice_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.notice_timeout_secs.min(i64::MAX as u64) as i64)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}
