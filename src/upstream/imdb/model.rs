use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

use crate::server::error::AppResult;

pub type DynImdbRepository = Arc<dyn ImdbRepository + Send + Sync>;

/// plain title search, the body is handed to the client untouched ({ "titles": [...] })
#[automock]
#[async_trait]
pub trait ImdbRepository {
    async fn search_titles(&self, query: &str) -> AppResult<Value>;
}
