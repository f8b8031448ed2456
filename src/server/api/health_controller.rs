use axum::Extension;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;
use tracing::warn;

use crate::logger::Logger;
use crate::server::dtos::health_dto::{
    HealthResponse, HealthStatus, ServiceHealthDetails, TmdbHealth,
};
use crate::server::services::Services;
use crate::server::{get_app_version, get_uptime_seconds};
use crate::upstream::TokenStatus;

/// never calls upstream, only reports what the process already knows
pub async fn health_endpoint(
    Extension(services): Extension<Services>,
) -> (StatusCode, Json<HealthResponse>) {
    let token_status = services.tokens.status().await;
    let tmdb_health = check_tmdb_config(&services);

    let overall_status = determine_overall_status(&tmdb_health, &token_status);

    let response = HealthResponse {
        status: overall_status,
        timestamp: Utc::now(),
        uptime_seconds: get_uptime_seconds(),
        version: get_app_version().to_string(),
        environment: Logger::environment_name(services.config.cargo_env).to_string(),
        services: ServiceHealthDetails {
            moviebox_token: token_status,
            tmdb: tmdb_health,
        },
    };

    let http_status = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (http_status, Json(response))
}

fn check_tmdb_config(services: &Services) -> TmdbHealth {
    let configured = !services.config.tmdb_api_key.trim().is_empty();

    TmdbHealth {
        status: if configured {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
        api_key_configured: configured,
    }
}

// a cold token cache is normal right after boot, it is fetched on the first moviebox call
fn determine_overall_status(tmdb: &TmdbHealth, _token: &TokenStatus) -> HealthStatus {
    match tmdb.status {
        HealthStatus::Healthy => HealthStatus::Healthy,
        _ => {
            warn!("tmdb api key missing, tmdb routes will fail");
            HealthStatus::Degraded
        }
    }
}
