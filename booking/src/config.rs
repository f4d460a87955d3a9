//! Configuration management for the venue client.
//!
//! Loads configuration from environment variables with sensible defaults.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend REST API
    pub api: ApiConfig,
    /// Local session persistence
    pub session: SessionConfig,
    /// The venue itself
    pub venue: VenueConfig,
    /// Log filter (trace, debug, info, warn, error or a full directive)
    pub log_level: String,
}

/// Backend REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// JSON file holding the signed-in session
    pub file: PathBuf,
}

/// Venue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Offset of the venue's local time from UTC, in minutes (São Paulo: -180)
    pub utc_offset_minutes: i32,
}

impl VenueConfig {
    /// The venue's UTC offset. Out-of-range values fall back to UTC.
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig {
                base_url: env::var("VENUE_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
                timeout_secs: env::var("VENUE_API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
            session: SessionConfig {
                file: env::var("VENUE_SESSION_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_session_file()),
            },
            venue: VenueConfig {
                utc_offset_minutes: env::var("VENUE_UTC_OFFSET_MINUTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(-180),
            },
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

fn default_session_file() -> PathBuf {
    env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".venue")
        .join("session.json")
}
