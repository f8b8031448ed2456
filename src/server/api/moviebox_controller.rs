// /api/wolfmovieapi, the moviebox style aggregator. bodies go back exactly as upstream sent them,
// the bearer token is added further down in the repository
use axum::extract::Json;
use axum::routing::get;
use axum::{Extension, Router};
use serde_json::Value;
use tracing::info;

use crate::server::dtos::moviebox_dto::{
    EpisodeQuery, FilterQuery, LandingResponse, MovieBoxSearchQuery, SubjectQuery, TrendingQuery,
};
use crate::server::error::AppResult;
use crate::server::extractors::ValidatedQuery;
use crate::server::services::Services;

pub struct MovieBoxController;

impl MovieBoxController {
    pub fn app() -> Router {
        Router::new()
            .route("/home", get(Self::home_endpoint))
            .route("/landing", get(Self::landing_endpoint))
            .route("/search", get(Self::search_endpoint))
            .route("/trending", get(Self::trending_endpoint))
            .route("/filter", get(Self::filter_endpoint))
            .route("/detail", get(Self::detail_endpoint))
            .route("/stream-domain", get(Self::stream_domain_endpoint))
            .route("/everyone-search", get(Self::everyone_search_endpoint))
            .route("/play", get(Self::play_endpoint))
            .route("/download", get(Self::download_endpoint))
    }

    pub async fn home_endpoint(Extension(services): Extension<Services>) -> AppResult<Json<Value>> {
        let body = services.moviebox.home().await?;
        Ok(Json(body))
    }

    /// GET /api/wolfmovieapi/landing
    ///
    /// home + trending merged, deduplicated by subject id and cut into genre rows of 3 or more
    pub async fn landing_endpoint(
        Extension(services): Extension<Services>,
    ) -> AppResult<Json<LandingResponse>> {
        let landing = services.catalog.landing().await?;
        Ok(Json(landing))
    }

    /// GET /api/wolfmovieapi/search?keyword=matrix&page=1&perPage=30
    ///
    /// upstream wants a POST, the ui gets a cacheable GET
    pub async fn search_endpoint(
        Extension(services): Extension<Services>,
        ValidatedQuery(query): ValidatedQuery<MovieBoxSearchQuery>,
    ) -> AppResult<Json<Value>> {
        let request = query.into_request();
        info!(
            "moviebox search for {:?} page {}",
            request.keyword, request.page
        );

        let body = services.moviebox.search(&request).await?;
        Ok(Json(body))
    }

    pub async fn trending_endpoint(
        Extension(services): Extension<Services>,
        ValidatedQuery(query): ValidatedQuery<TrendingQuery>,
    ) -> AppResult<Json<Value>> {
        let body = services
            .moviebox
            .trending(query.page.unwrap_or(1), query.per_page.unwrap_or(18))
            .await?;
        Ok(Json(body))
    }

    /// GET /api/wolfmovieapi/filter?channelId=1&genre=Action&year=2024&page=1
    pub async fn filter_endpoint(
        Extension(services): Extension<Services>,
        ValidatedQuery(query): ValidatedQuery<FilterQuery>,
    ) -> AppResult<Json<Value>> {
        let body = services.moviebox.filter(&query.into_request()).await?;
        Ok(Json(body))
    }

    pub async fn detail_endpoint(
        Extension(services): Extension<Services>,
        ValidatedQuery(query): ValidatedQuery<SubjectQuery>,
    ) -> AppResult<Json<Value>> {
        let subject_id = query.subject_id.unwrap_or_default();
        let body = services.moviebox.detail(&subject_id).await?;
        Ok(Json(body))
    }

    pub async fn stream_domain_endpoint(
        Extension(services): Extension<Services>,
    ) -> AppResult<Json<Value>> {
        let body = services.moviebox.stream_domain().await?;
        Ok(Json(body))
    }

    pub async fn everyone_search_endpoint(
        Extension(services): Extension<Services>,
    ) -> AppResult<Json<Value>> {
        let body = services.moviebox.everyone_search().await?;
        Ok(Json(body))
    }

    /// GET /api/wolfmovieapi/play?subjectId=..&se=1&ep=3
    pub async fn play_endpoint(
        Extension(services): Extension<Services>,
        ValidatedQuery(query): ValidatedQuery<EpisodeQuery>,
    ) -> AppResult<Json<Value>> {
        let body = services.moviebox.play(&query.into_episode()).await?;
        Ok(Json(body))
    }

    pub async fn download_endpoint(
        Extension(services): Extension<Services>,
        ValidatedQuery(query): ValidatedQuery<EpisodeQuery>,
    ) -> AppResult<Json<Value>> {
        let body = services.moviebox.download(&query.into_episode()).await?;
        Ok(Json(body))
    }
}
