use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::catalog::MediaKind;
use crate::server::error::AppResult;
use crate::upstream::{UpstreamConnection, join_url};

use super::{EmbedLink, EmbedLinksResponse, EmbedQuery, ShowboxRepository};

pub struct ShowboxHttpRepository {
    connection: Arc<UpstreamConnection>,
    base_url: String,
}

impl ShowboxHttpRepository {
    pub fn new(connection: Arc<UpstreamConnection>, base_url: &str) -> Self {
        Self {
            connection,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl ShowboxRepository for ShowboxHttpRepository {
    async fn links(&self, query: &EmbedQuery) -> AppResult<Vec<EmbedLink>> {
        let kind = match query.kind {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        };

        let mut params = vec![("title", query.title.clone()), ("type", kind.to_string())];
        if query.kind == MediaKind::Series {
            params.push(("season", query.season.unwrap_or(1).to_string()));
            params.push(("episode", query.episode.unwrap_or(1).to_string()));
        }

        let request = self
            .connection
            .client
            .get(join_url(&self.base_url, "/api/links"))
            .query(&params);

        let response: EmbedLinksResponse = self.connection.send_json("showbox", request).await?;
        let links = response.into_links();

        debug!("showbox has {} links for {:?}", links.len(), query.title);

        Ok(links)
    }
}
