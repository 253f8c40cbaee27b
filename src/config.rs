use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::LookaheadMode;

/// Application-level constants
pub const APP_NAME: &str = "MedReview";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Case files offered first in the file picker.
pub const DEFAULT_CASE_FILES: &[&str] = &["Medbot.json", "Baseline1.json"];

/// Default port for the review API.
pub const DEFAULT_PORT: u16 = 8501;

/// Optional settings file inside the app data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,medreview_lib=debug"
}

/// Get the application data directory
/// ~/MedReview/ on all platforms. Falls back to the working directory
/// when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Directory holding the case-collection files.
pub fn simulations_dir() -> PathBuf {
    app_data_dir().join("simulations")
}

/// Directory receiving the review ledgers.
pub fn reviews_dir() -> PathBuf {
    app_data_dir().join("reviews")
}

/// Runtime settings for a reviewer instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub simulations_dir: PathBuf,
    pub reviews_dir: PathBuf,
    pub case_files: Vec<String>,
    pub bind_addr: SocketAddr,
    pub lookahead: LookaheadMode,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            simulations_dir: simulations_dir(),
            reviews_dir: reviews_dir(),
            case_files: DEFAULT_CASE_FILES.iter().map(|s| s.to_string()).collect(),
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            lookahead: LookaheadMode::default(),
        }
    }
}

impl ReviewConfig {
    /// Load `config.json` from the app data directory, or defaults.
    pub fn load() -> Self {
        Self::load_from(&app_data_dir().join(CONFIG_FILE_NAME))
    }

    /// Load settings from `path`. Missing keys take defaults; a missing or
    /// unreadable file yields the defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Config unreadable, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Config invalid, using defaults");
                Self::default()
            }
        }
    }
}
