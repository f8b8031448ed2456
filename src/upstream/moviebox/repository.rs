// moviebox-style aggregator, every call needs the shared bearer token
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::server::error::{AppResult, Error};
use crate::upstream::{DynTokenProvider, UpstreamConnection, join_url};

use super::{EpisodeRef, FilterRequest, MovieBoxRepository, SearchRequest};

const LABEL: &str = "moviebox";

pub struct MovieBoxHttpRepository {
    connection: Arc<UpstreamConnection>,
    tokens: DynTokenProvider,
    base_url: String,
}

impl MovieBoxHttpRepository {
    pub fn new(
        connection: Arc<UpstreamConnection>,
        tokens: DynTokenProvider,
        base_url: &str,
    ) -> Self {
        Self {
            connection,
            tokens,
            base_url: base_url.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn decorate(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        let referer = format!("{}/", self.base_url.trim_end_matches('/'));

        request
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::REFERER, referer)
            .header("X-Client-Info", r#"{"timezone":"UTC"}"#)
    }

    async fn send_once<F>(&self, build: &F, token: &str) -> AppResult<Value>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder + Send + Sync,
    {
        let request = self.decorate(build(&self.connection.client), token);
        self.connection.send_json::<Value>(LABEL, request).await
    }

    /// sends with the cached token, on a 401 the token is dropped and the call goes out once more
    /// with a fresh one. a second 401 is returned as is
    async fn send_authorized<F>(&self, build: F) -> AppResult<Value>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder + Send + Sync,
    {
        let token = self.tokens.get_token().await?;

        match self.send_once(&build, &token).await {
            Err(Error::UpstreamUnauthorized(message)) => {
                warn!(
                    "moviebox rejected the cached token ({}), fetching a new one",
                    message
                );
                self.tokens.invalidate().await;

                let token = self.tokens.get_token().await?;
                self.send_once(&build, &token).await
            }
            other => other,
        }
    }
}

#[async_trait]
impl MovieBoxRepository for MovieBoxHttpRepository {
    async fn home(&self) -> AppResult<Value> {
        let url = self.url("/wefeed-h5-bff/web/home");
        self.send_authorized(|client| client.get(&url)).await
    }

    async fn search(&self, request: &SearchRequest) -> AppResult<Value> {
        debug!("moviebox search for {:?}", request.keyword);
        let url = self.url("/wefeed-h5-bff/web/subject/search");
        self.send_authorized(|client| client.post(&url).json(request)).await
    }

    async fn trending(&self, page: u32, per_page: u32) -> AppResult<Value> {
        let url = self.url("/wefeed-h5-bff/web/subject/trending");
        self.send_authorized(|client| {
            client
                .get(&url)
                .query(&[("page", page), ("perPage", per_page)])
        })
        .await
    }

    async fn filter(&self, request: &FilterRequest) -> AppResult<Value> {
        let url = self.url("/wefeed-h5-bff/web/filter");
        self.send_authorized(|client| client.post(&url).json(request)).await
    }

    async fn detail(&self, subject_id: &str) -> AppResult<Value> {
        let url = self.url("/wefeed-h5-bff/web/subject/detail");
        self.send_authorized(|client| {
            client.get(&url).query(&[("subjectId", subject_id)])
        })
        .await
    }

    async fn stream_domain(&self) -> AppResult<Value> {
        let url = self.url("/wefeed-h5-bff/web/media-player/get-domain");
        self.send_authorized(|client| client.get(&url)).await
    }

    async fn everyone_search(&self) -> AppResult<Value> {
        let url = self.url("/wefeed-h5-bff/web/subject/everyone-search");
        self.send_authorized(|client| client.post(&url).json(&json!({}))).await
    }

    async fn play(&self, episode: &EpisodeRef) -> AppResult<Value> {
        let url = self.url("/wefeed-h5-bff/web/subject/play");
        self.send_authorized(|client| client.get(&url).query(&episode_query(episode))).await
    }

    async fn download(&self, episode: &EpisodeRef) -> AppResult<Value> {
        let url = self.url("/wefeed-h5-bff/web/subject/download");
        self.send_authorized(|client| client.get(&url).query(&episode_query(episode))).await
    }
}

fn episode_query(episode: &EpisodeRef) -> [(&'static str, String); 3] {
    [
        ("subjectId", episode.subject_id.clone()),
        ("se", episode.season.to_string()),
        ("ep", episode.episode.to_string()),
    ]
}
