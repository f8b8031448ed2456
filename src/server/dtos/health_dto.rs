use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::upstream::TokenStatus;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub version: String,
    pub environment: String,
    pub services: ServiceHealthDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceHealthDetails {
    pub moviebox_token: TokenStatus,
    pub tmdb: TmdbHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TmdbHealth {
    pub status: HealthStatus,
    pub api_key_configured: bool,
}
