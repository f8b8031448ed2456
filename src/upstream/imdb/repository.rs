use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::server::error::AppResult;
use crate::upstream::{UpstreamConnection, join_url};

use super::ImdbRepository;

pub struct ImdbHttpRepository {
    connection: Arc<UpstreamConnection>,
    base_url: String,
}

impl ImdbHttpRepository {
    pub fn new(connection: Arc<UpstreamConnection>, base_url: &str) -> Self {
        Self {
            connection,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl ImdbRepository for ImdbHttpRepository {
    async fn search_titles(&self, query: &str) -> AppResult<Value> {
        let request = self
            .connection
            .client
            .get(join_url(&self.base_url, "/search/titles"))
            .query(&[("query", query)]);

        self.connection.send_json("imdb", request).await
    }
}
