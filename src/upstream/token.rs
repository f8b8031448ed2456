// moviebox bearer token handling
//
// the aggregator hands out anonymous tokens from an auxiliary endpoint through a response header,
// we keep one around for a fixed ttl and share it across every request
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::server::error::{AppResult, Error};

use super::{UpstreamConnection, join_url};

pub const TOKEN_PATH: &str = "/wefeed-h5-bff/app/get-latest-app-pkgs?app_name=moviebox";
pub const TOKEN_HEADER: &str = "x-user";

pub type DynTokenSource = Arc<dyn TokenSource + Send + Sync>;
pub type DynTokenProvider = Arc<dyn TokenProvider + Send + Sync>;

/// where fresh tokens come from, one call = one upstream request
#[automock]
#[async_trait]
pub trait TokenSource {
    async fn fetch_token(&self) -> AppResult<String>;
}

#[automock]
#[async_trait]
pub trait TokenProvider {
    /// cached token if it's younger than the ttl, otherwise a fresh one
    async fn get_token(&self) -> AppResult<String>;

    /// forget the cached token, the next get_token goes upstream
    async fn invalidate(&self);

    async fn status(&self) -> TokenStatus;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenStatus {
    pub cached: bool,
    pub age_seconds: Option<u64>,
    pub ttl_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct XUserHeader {
    token: Option<String>,
}

pub struct MovieBoxTokenSource {
    connection: Arc<UpstreamConnection>,
    token_url: String,
}

impl MovieBoxTokenSource {
    pub fn new(connection: Arc<UpstreamConnection>, base_url: &str) -> Self {
        Self {
            connection,
            token_url: join_url(base_url, TOKEN_PATH),
        }
    }

    /// the header is json like {"userId":..,"token":".."} but older deployments sent the bare
    /// token, take whichever shows up
    pub fn parse_header(raw: &str) -> AppResult<String> {
        let raw = raw.trim();

        if raw.starts_with('{') {
            let parsed: XUserHeader = serde_json::from_str(raw).map_err(|e| {
                Error::Upstream(format!("moviebox token header is not valid json: {}", e))
            })?;

            return parsed
                .token
                .filter(|t| !t.is_empty())
                .ok_or_else(|| Error::Upstream("moviebox token header has no token".to_string()));
        }

        if raw.is_empty() {
            return Err(Error::Upstream("moviebox token header is empty".to_string()));
        }

        Ok(raw.to_string())
    }
}

#[async_trait]
impl TokenSource for MovieBoxTokenSource {
    async fn fetch_token(&self) -> AppResult<String> {
        info!("requesting a new moviebox token");

        let response = self
            .connection
            .client
            .get(&self.token_url)
            .send()
            .await
            .map_err(|e| {
                error!("moviebox token request failed: {}", e);
                Error::Upstream(format!("moviebox token request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "moviebox token endpoint returned {}",
                response.status()
            )));
        }

        let header = response
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                Error::Upstream(format!(
                    "moviebox token response is missing the {} header",
                    TOKEN_HEADER
                ))
            })?;

        Self::parse_header(header)
    }
}

struct CachedToken {
    value: String,
    issued_at: Instant,
}

/// fixed ttl cache in front of a token source
///
/// the lock is held across the refresh so a burst of first requests waits on one fetch instead
/// of each going upstream
pub struct CachedTokenProvider {
    source: DynTokenSource,
    ttl: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl CachedTokenProvider {
    pub fn new(source: DynTokenSource, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TokenProvider for CachedTokenProvider {
    async fn get_token(&self) -> AppResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            let age = token.issued_at.elapsed();
            if age < self.ttl {
                debug!("reusing moviebox token issued {}s ago", age.as_secs());
                return Ok(token.value.clone());
            }
            info!(
                "moviebox token is {}s old (ttl {}s), refreshing",
                age.as_secs(),
                self.ttl.as_secs()
            );
        }

        let value = self.source.fetch_token().await?;
        metrics::counter!("moviebox_token_refresh_total").increment(1);

        *cached = Some(CachedToken {
            value: value.clone(),
            issued_at: Instant::now(),
        });

        Ok(value)
    }

    async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        if cached.take().is_some() {
            info!("moviebox token invalidated");
        }
    }

    async fn status(&self) -> TokenStatus {
        let cached = self.cached.lock().await;

        TokenStatus {
            cached: cached.is_some(),
            age_seconds: cached.as_ref().map(|t| t.issued_at.elapsed().as_secs()),
            ttl_seconds: self.ttl.as_secs(),
        }
    }
}
