use axum::extract::Json;
use axum::routing::get;
use axum::{Extension, Router};
use serde_json::Value;

use crate::server::dtos::proxy_dto::ImdbSearchQuery;
use crate::server::error::AppResult;
use crate::server::extractors::ValidatedQuery;
use crate::server::services::Services;

pub struct ImdbController;

impl ImdbController {
    pub fn app() -> Router {
        Router::new().route("/search", get(Self::search_endpoint))
    }

    /// GET /api/imdb/search?q=inception
    pub async fn search_endpoint(
        Extension(services): Extension<Services>,
        ValidatedQuery(query): ValidatedQuery<ImdbSearchQuery>,
    ) -> AppResult<Json<Value>> {
        let q = query.q.unwrap_or_default();
        let body = services.imdb.search_titles(&q).await?;
        Ok(Json(body))
    }
}
