use axum::extract::Json;
use axum::routing::get;
use axum::{Extension, Router};
use tracing::info;

use crate::server::dtos::watch_dto::{ResolveRequest, WatchSourcesQuery, WatchSourcesResponse};
use crate::server::error::AppResult;
use crate::server::extractors::ValidatedQuery;
use crate::server::services::Services;

pub struct WatchController;

impl WatchController {
    pub fn app() -> Router {
        Router::new().route("/sources", get(Self::sources_endpoint))
    }

    /// GET /api/watch/sources?title=Severance&kind=series&season=1&episode=2
    ///
    /// runs the player's embed first, direct second fallback and returns where it settled.
    /// `source` and `index` replay a manual switch or pick on top of that
    pub async fn sources_endpoint(
        Extension(services): Extension<Services>,
        ValidatedQuery(query): ValidatedQuery<WatchSourcesQuery>,
    ) -> AppResult<Json<WatchSourcesResponse>> {
        let request = ResolveRequest::try_from(query)?;
        info!(
            "resolving sources for {} ({:?} s{:?}e{:?})",
            request.title, request.kind, request.season, request.episode
        );

        let state = services.sources.resolve(request).await?;
        Ok(Json(WatchSourcesResponse::from(state)))
    }
}
