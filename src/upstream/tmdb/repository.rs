use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::server::error::AppResult;
use crate::upstream::{UpstreamConnection, join_url};

use super::{TimeWindow, TmdbMedia, TmdbRepository, TrendingMedia};

const LABEL: &str = "tmdb";

// what the detail page needs in one round trip
const DETAIL_APPEND: &str = "credits,videos,similar,external_ids";

pub struct TmdbHttpRepository {
    connection: Arc<UpstreamConnection>,
    base_url: String,
    api_key: String,
}

impl TmdbHttpRepository {
    pub fn new(connection: Arc<UpstreamConnection>, base_url: &str, api_key: &str) -> Self {
        Self {
            connection,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> AppResult<Value> {
        let request = self
            .connection
            .client
            .get(join_url(&self.base_url, path))
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .query(params);

        self.connection.send_json(LABEL, request).await
    }
}

#[async_trait]
impl TmdbRepository for TmdbHttpRepository {
    async fn trending(
        &self,
        media: TrendingMedia,
        window: TimeWindow,
        page: u32,
    ) -> AppResult<Value> {
        let path = format!("/trending/{}/{}", media.as_path(), window.as_path());
        self.get(&path, &[("page", page.to_string())]).await
    }

    async fn popular(&self, media: TmdbMedia, page: u32) -> AppResult<Value> {
        let path = format!("/{}/popular", media.as_path());
        self.get(&path, &[("page", page.to_string())]).await
    }

    async fn top_rated(&self, media: TmdbMedia, page: u32) -> AppResult<Value> {
        let path = format!("/{}/top_rated", media.as_path());
        self.get(&path, &[("page", page.to_string())]).await
    }

    async fn discover(
        &self,
        media: TmdbMedia,
        genre: Option<String>,
        page: u32,
    ) -> AppResult<Value> {
        let path = format!("/discover/{}", media.as_path());
        let mut params = vec![
            ("page", page.to_string()),
            ("sort_by", "popularity.desc".to_string()),
        ];
        if let Some(genre) = genre {
            params.push(("with_genres", genre));
        }
        self.get(&path, &params).await
    }

    async fn search(&self, query: &str, page: u32) -> AppResult<Value> {
        self.get(
            "/search/multi",
            &[
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("include_adult", "false".to_string()),
            ],
        )
        .await
    }

    async fn genres(&self, media: TmdbMedia) -> AppResult<Value> {
        let path = format!("/genre/{}/list", media.as_path());
        self.get(&path, &[]).await
    }

    async fn detail(&self, media: TmdbMedia, id: u64) -> AppResult<Value> {
        let path = format!("/{}/{}", media.as_path(), id);
        self.get(&path, &[("append_to_response", DETAIL_APPEND.to_string())])
            .await
    }

    async fn season(&self, tv_id: u64, season: u32) -> AppResult<Value> {
        let path = format!("/tv/{}/season/{}", tv_id, season);
        self.get(&path, &[]).await
    }
}
