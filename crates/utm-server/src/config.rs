//! Server configuration from environment.

use std::env;

use utm_core::Configuration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub log_format: String,
    pub allowed_origins: Vec<String>,
    /// Seconds between queue-drain attempts for missions with no idle aircraft.
    pub queue_drain_interval_secs: u64,
    /// Seconds between conflict rescans of all committed trajectories.
    pub conflict_scan_interval_secs: u64,
    pub core: Configuration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("UTM_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            log_format: env::var("UTM_LOG_FORMAT").unwrap_or_default(),
            allowed_origins: env::var("UTM_CORS_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|o| o.trim().to_string()).filter(|o| !o.is_empty()).collect())
                .unwrap_or_default(),
            queue_drain_interval_secs: env::var("UTM_QUEUE_DRAIN_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            conflict_scan_interval_secs: env::var("UTM_CONFLICT_SCAN_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            core: Configuration::from_env(),
        }
    }
}
