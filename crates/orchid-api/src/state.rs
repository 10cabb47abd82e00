//! Application state management

use crate::auth::JwtConfig;
use orchid_core::config::AppConfig;
use sqlx::PgPool;
use std::time::Instant;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database pool
    pub db: PgPool,
    /// Token signing configuration, built once from config and injected
    /// everywhere tokens are signed or checked
    pub jwt: JwtConfig,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, db: PgPool) -> Self {
        let jwt = JwtConfig::from(&config.auth);
        Self {
            config,
            db,
            jwt,
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
