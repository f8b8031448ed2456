// fun file!
mod api;
pub mod dtos;
pub mod error;
pub mod extractors;
pub mod services;
pub mod utils;

use std::future::ready;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use axum::Extension;
use axum::extract::MatchedPath;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, Request};
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{BoxError, Json, Router, error_handling::HandleErrorLayer, http::StatusCode};
use lazy_static::lazy_static;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use serde_json::json;
use tower::{ServiceBuilder, buffer::BufferLayer, limit::RateLimitLayer};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::server::api::{
    arslan_controller::ArslanController, health_controller, imdb_controller::ImdbController,
    moviebox_controller::MovieBoxController, tmdb_controller::TmdbController,
    watch_controller::WatchController,
};
use crate::server::services::Services;

lazy_static! {
    static ref START_TIME: Instant = Instant::now();
    static ref EXPONENTIAL_SECONDS: &'static [f64] = &[
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];
}

pub fn get_app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn get_uptime_seconds() -> u64 {
    START_TIME.elapsed().as_secs()
}

pub struct ApplicationServer;

impl ApplicationServer {
    pub async fn serve(config: Arc<AppConfig>) -> anyhow::Result<()> {
        lazy_static::initialize(&START_TIME);

        // do this however you like, i use the prometheus exporter because grafana is nice
        let recorder_handle = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(String::from("http_requests_duration_seconds")),
                *EXPONENTIAL_SECONDS,
            )
            .context("could not setup metric buckets, what happened to my EXPONENTIAL_SECONDS?")?
            .install_recorder()
            .context("i can't run the metric recorder yo")?;

        let services = Services::new(config.clone()).context("upstream clients failed to build")?;

        let router = Self::router(services, Some(recorder_handle));

        let port = format!("0.0.0.0:{}", config.port);
        let addr = tokio::net::TcpListener::bind(&port)
            .await
            .with_context(|| format!("could not bind {}", port))?;

        info!("Setup completed, initialized server on port {port}");
        debug!("routes initialized, listening on port {}", &port);

        axum::serve(addr, router)
            .with_graceful_shutdown(Self::shutdown_signal())
            .await
            .context("axum serving failed")?;

        Ok(())
    }

    /// the whole app minus the listener, tests drive this directly with oneshot
    pub fn router(services: Services, metrics: Option<PrometheusHandle>) -> Router {
        let config = services.config.clone();
        let request_timeout = config.request_timeout_secs;

        let api_routes = Router::new()
            .nest("/tmdb", TmdbController::app())
            .nest("/wolfmovieapi", MovieBoxController::app())
            .nest("/imdb", ImdbController::app())
            .nest("/arslan", ArslanController::app())
            .nest("/watch", WatchController::app());

        let mut router = Router::new()
            .nest("/api", api_routes)
            .route("/health", get(health_controller::health_endpoint))
            .route("/", get(api::health));

        if let Some(handle) = metrics {
            router = router.route("/metrics", get(move || ready(handle.render())));
        }

        router
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(HandleErrorLayer::new(move |err: BoxError| {
                        Self::handle_timeout_error(err, request_timeout)
                    }))
                    .timeout(Duration::from_secs(request_timeout))
                    .layer(Extension(services))
                    .layer(BufferLayer::new(1024))
                    .layer(RateLimitLayer::new(
                        config.rate_limit_per_second.max(1),
                        Duration::from_secs(1),
                    )),
            )
            .layer(Self::cors(&config.cors_origin))
            .route_layer(middleware::from_fn(Self::track_metrics))
            .fallback(Self::handle_404)
    }

    // "*" opens everything, otherwise a comma separated list of exact origins
    fn cors(cors_origin: &str) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

        if cors_origin.trim() == "*" {
            return layer.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = cors_origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("ignoring unusable cors origin {:?}", o);
                    None
                }
            })
            .collect();

        layer.allow_origin(AllowOrigin::list(origins))
    }

    // custom timeout layer
    async fn handle_timeout_error(
        err: BoxError,
        timeout_secs: u64,
    ) -> (StatusCode, Json<serde_json::Value>) {
        if err.is::<tower::timeout::error::Elapsed>() {
            (
                StatusCode::REQUEST_TIMEOUT,
                Json(json!({
                    "error":
                        format!(
                            "request took longer than the configured {} second timeout",
                            timeout_secs
                        )
                })),
            )
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("unhandled internal error: {}", err)
                })),
            )
        }
    }

    async fn track_metrics(request: Request<axum::body::Body>, next: Next) -> impl IntoResponse {
        let path = if let Some(matched_path) = request.extensions().get::<MatchedPath>() {
            matched_path.as_str().to_owned()
        } else {
            request.uri().path().to_owned()
        };
        let start = Instant::now();
        let method = request.method().clone();
        let response = next.run(request).await;
        let latency = start.elapsed().as_secs_f64();
        let status = response.status().as_u16().to_string();

        metrics::counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "path" => path.clone(),
            "status" => status.clone()
        )
        .increment(1);

        metrics::histogram!(
            "http_requests_duration_seconds",
            "method" => method.to_string(),
            "path" => path,
            "status" => status
        )
        .record(latency);

        response
    }

    async fn shutdown_signal() {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("could not listen for ctrl-c, shutting down now: {}", e);
        }
        info!("signal shutdown");
    }

    async fn handle_404() -> impl IntoResponse {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "This resource doesn't exist." })),
        )
    }
}
