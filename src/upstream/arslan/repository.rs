use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::server::error::AppResult;
use crate::upstream::{UpstreamConnection, join_url};

use super::{ArslanEndpoint, ArslanRepository};

pub struct ArslanHttpRepository {
    connection: Arc<UpstreamConnection>,
    base_url: String,
}

impl ArslanHttpRepository {
    pub fn new(connection: Arc<UpstreamConnection>, base_url: &str) -> Self {
        Self {
            connection,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl ArslanRepository for ArslanHttpRepository {
    async fn fetch(&self, endpoint: &ArslanEndpoint, value: &str) -> AppResult<Value> {
        debug!(
            "arslan {}/{} with {}={}",
            endpoint.source,
            endpoint.action,
            endpoint.param.name(),
            value
        );

        let request = self
            .connection
            .client
            .get(join_url(&self.base_url, endpoint.path))
            .query(&[(endpoint.param.name(), value)]);

        self.connection.send_json("arslan", request).await
    }
}
