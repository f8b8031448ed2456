use axum::extract::{Json, Path};
use axum::routing::get;
use axum::{Extension, Router};
use serde_json::Value;
use tracing::info;

use crate::server::dtos::tmdb_dto::{DiscoverQuery, PageQuery, TmdbSearchQuery};
use crate::server::error::{AppResult, Error};
use crate::server::extractors::ValidatedQuery;
use crate::server::services::Services;
use crate::upstream::tmdb::{TimeWindow, TmdbMedia, TrendingMedia};

pub struct TmdbController;

impl TmdbController {
    pub fn app() -> Router {
        Router::new()
            .route("/trending/{media}/{window}", get(Self::trending_endpoint))
            .route("/popular/{media}", get(Self::popular_endpoint))
            .route("/top-rated/{media}", get(Self::top_rated_endpoint))
            .route("/discover/{media}", get(Self::discover_endpoint))
            .route("/search", get(Self::search_endpoint))
            .route("/genres/{media}", get(Self::genres_endpoint))
            .route("/detail/{media}/{id}", get(Self::detail_endpoint))
            .route("/tv/{id}/season/{season}", get(Self::season_endpoint))
    }

    /// GET /api/tmdb/trending/{all|movie|tv}/{day|week}?page=
    pub async fn trending_endpoint(
        Extension(services): Extension<Services>,
        Path((media, window)): Path<(String, String)>,
        ValidatedQuery(query): ValidatedQuery<PageQuery>,
    ) -> AppResult<Json<Value>> {
        let media = TrendingMedia::parse(&media).ok_or_else(|| {
            Error::BadRequest(format!(
                "Unsupported media type: {}, expected all, movie or tv",
                media
            ))
        })?;
        let window = TimeWindow::parse(&window).ok_or_else(|| {
            Error::BadRequest(format!(
                "Unsupported time window: {}, expected day or week",
                window
            ))
        })?;

        let body = services.tmdb.trending(media, window, query.page()).await?;
        Ok(Json(body))
    }

    pub async fn popular_endpoint(
        Extension(services): Extension<Services>,
        Path(media): Path<String>,
        ValidatedQuery(query): ValidatedQuery<PageQuery>,
    ) -> AppResult<Json<Value>> {
        let media = parse_media(&media)?;
        let body = services.tmdb.popular(media, query.page()).await?;
        Ok(Json(body))
    }

    pub async fn top_rated_endpoint(
        Extension(services): Extension<Services>,
        Path(media): Path<String>,
        ValidatedQuery(query): ValidatedQuery<PageQuery>,
    ) -> AppResult<Json<Value>> {
        let media = parse_media(&media)?;
        let body = services.tmdb.top_rated(media, query.page()).await?;
        Ok(Json(body))
    }

    /// GET /api/tmdb/discover/{movie|tv}?genre=28&page=2
    ///
    /// backs the genre pages (animation is genre 16 on both sides)
    pub async fn discover_endpoint(
        Extension(services): Extension<Services>,
        Path(media): Path<String>,
        ValidatedQuery(query): ValidatedQuery<DiscoverQuery>,
    ) -> AppResult<Json<Value>> {
        let media = parse_media(&media)?;
        let genre = query.genre.filter(|g| !g.trim().is_empty());

        let body = services
            .tmdb
            .discover(media, genre, query.page.unwrap_or(1))
            .await?;
        Ok(Json(body))
    }

    /// GET /api/tmdb/search?query=dune&page=1
    pub async fn search_endpoint(
        Extension(services): Extension<Services>,
        ValidatedQuery(query): ValidatedQuery<TmdbSearchQuery>,
    ) -> AppResult<Json<Value>> {
        let text = query.query.unwrap_or_default();
        info!("tmdb search for {:?}", text);

        let body = services
            .tmdb
            .search(&text, query.page.unwrap_or(1))
            .await?;
        Ok(Json(body))
    }

    pub async fn genres_endpoint(
        Extension(services): Extension<Services>,
        Path(media): Path<String>,
    ) -> AppResult<Json<Value>> {
        let media = parse_media(&media)?;
        let body = services.tmdb.genres(media).await?;
        Ok(Json(body))
    }

    /// GET /api/tmdb/detail/{movie|tv}/{id}
    ///
    /// credits, videos, similar and external ids come back in the same body
    pub async fn detail_endpoint(
        Extension(services): Extension<Services>,
        Path((media, id)): Path<(String, String)>,
    ) -> AppResult<Json<Value>> {
        let media = parse_media(&media)?;
        let id = parse_id(&id)?;

        let body = services.tmdb.detail(media, id).await?;
        Ok(Json(body))
    }

    pub async fn season_endpoint(
        Extension(services): Extension<Services>,
        Path((id, season)): Path<(String, String)>,
    ) -> AppResult<Json<Value>> {
        let id = parse_id(&id)?;
        let season = season
            .parse::<u32>()
            .map_err(|_| Error::BadRequest(format!("Invalid season number: {}", season)))?;

        let body = services.tmdb.season(id, season).await?;
        Ok(Json(body))
    }
}

fn parse_media(media: &str) -> AppResult<TmdbMedia> {
    TmdbMedia::parse(media).ok_or_else(|| {
        Error::BadRequest(format!("Unsupported media type: {}, expected movie or tv", media))
    })
}

fn parse_id(id: &str) -> AppResult<u64> {
    id.parse::<u64>()
        .map_err(|_| Error::BadRequest(format!("Invalid tmdb id: {}", id)))
}
