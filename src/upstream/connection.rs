use std::time::Duration;

use anyhow::Context;
use axum::http::StatusCode;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::server::error::{AppResult, Error};

// the upstreams don't care, but a couple of them sit behind cloudflare and a browser agent keeps
// the 403s away
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:145.0) Gecko/20100101 Firefox/145.0";

// enough of an error body to know what went wrong without dumping a whole html page in the logs
const MAX_ERROR_BODY: usize = 300;

/// one pooled http client shared by every upstream
#[derive(Debug, Clone)]
pub struct UpstreamConnection {
    pub client: reqwest::Client,
}

impl UpstreamConnection {
    pub fn connect(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .gzip(true)
            .build()
            .context("Failed to build upstream http client")?;

        info!(
            "upstream client ready with a {} second timeout",
            timeout.as_secs()
        );

        Ok(Self { client })
    }

    /// send a prepared request and decode the json body, any non 2xx is an error
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        label: &str,
        request: RequestBuilder,
    ) -> AppResult<T> {
        let response = request.send().await.map_err(|e| {
            error!("{} request failed: {}", label, e);
            Error::Upstream(format!("{} request failed: {}", label, e))
        })?;

        let status = response.status();
        debug!("{} responded with {}", label, status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "No response".to_string());
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            let message = format!("{} returned {}: {}", label, status, body);

            if status.as_u16() == StatusCode::UNAUTHORIZED.as_u16() {
                return Err(Error::UpstreamUnauthorized(message));
            }
            return Err(Error::Upstream(message));
        }

        response.json::<T>().await.map_err(|e| {
            error!("{} sent a body we couldn't decode: {}", label, e);
            Error::Upstream(format!("{} returned invalid json: {}", label, e))
        })
    }
}

/// joins a configured base url and a path without doubling or dropping the slash
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_handles_slashes() {
        assert_eq!(join_url("http://a.b/", "/x/y"), "http://a.b/x/y");
        assert_eq!(join_url("http://a.b/3", "movie/1"), "http://a.b/3/movie/1");
    }
}
