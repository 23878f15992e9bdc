//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the local account database.
    pub db_path: PathBuf,
    /// Directory holding the display resources the gate loads.
    pub asset_dir: PathBuf,
    /// Directory the filesystem picker selects from.
    pub pick_dir: PathBuf,
    /// Fixed delay applied to authentication, standing in for network
    /// round-trip latency.
    pub auth_delay: Duration,
    /// Upper bound for each resource loader. `None` leaves loads unbounded.
    pub gate_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/staffing.db"),
            asset_dir: PathBuf::from("./assets"),
            pick_dir: PathBuf::from("./uploads"),
            auth_delay: Duration::from_secs(2),
            gate_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl AppConfig {
    /// Read configuration from `STAFFING_*` environment variables, keeping
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("STAFFING_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("STAFFING_ASSET_DIR") {
            config.asset_dir = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("STAFFING_PICK_DIR") {
            config.pick_dir = PathBuf::from(path);
        }
        if let Ok(ms) = std::env::var("STAFFING_AUTH_DELAY_MS")
            && let Ok(ms) = ms.parse::<u64>()
        {
            config.auth_delay = Duration::from_millis(ms);
        }
        if let Ok(ms) = std::env::var("STAFFING_GATE_TIMEOUT_MS")
            && let Ok(ms) = ms.parse::<u64>()
        {
            // 0 disables the bound.
            config.gate_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        config
    }
}
