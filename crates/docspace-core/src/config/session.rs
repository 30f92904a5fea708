//! Session management configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds. Also used as the token lifetime.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Expired session sweeper settings.
    #[serde(default)]
    pub cleanup: SessionCleanupConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            cleanup: SessionCleanupConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Returns the session TTL as a [`chrono::Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::seconds(i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX / 1000))
    }
}

/// Background removal of expired session rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCleanupConfig {
    /// Whether the sweeper runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval between sweeps in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub interval_minutes: u64,
}

impl Default for SessionCleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_ttl() -> u64 {
    86_400
}

fn default_true() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    15
}
