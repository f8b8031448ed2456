// query shapes for /api/wolfmovieapi, named after the upstream's camelCase params since the ui
// already speaks them
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::GenreBucket;
use crate::server::dtos::trimmed;
use crate::upstream::moviebox::{EpisodeRef, FilterRequest, SearchRequest};

const DEFAULT_PER_PAGE: u32 = 24;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MovieBoxSearchQuery {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "Missing required query parameter: keyword"))]
    pub keyword: Option<String>,

    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "perPage must be between 1 and 100"))]
    pub per_page: Option<u32>,

    /// 0 searches everything
    pub subject_type: Option<i64>,
}

impl MovieBoxSearchQuery {
    pub fn into_request(self) -> SearchRequest {
        SearchRequest {
            keyword: self.keyword.unwrap_or_default(),
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE),
            subject_type: self.subject_type.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrendingQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "perPage must be between 1 and 100"))]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "perPage must be between 1 and 100"))]
    pub per_page: Option<u32>,

    pub channel_id: Option<i64>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub year: Option<String>,
    pub sort: Option<String>,
}

impl FilterQuery {
    pub fn into_request(self) -> FilterRequest {
        FilterRequest {
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE),
            channel_id: self.channel_id,
            genre: self.genre,
            country: self.country,
            year: self.year,
            sort: self.sort,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubjectQuery {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "Missing required query parameter: subjectId"))]
    pub subject_id: Option<String>,
}

/// se/ep are left out for movies
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeQuery {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "Missing required query parameter: subjectId"))]
    pub subject_id: Option<String>,
    pub se: Option<u32>,
    pub ep: Option<u32>,
}

impl EpisodeQuery {
    pub fn into_episode(self) -> EpisodeRef {
        EpisodeRef {
            subject_id: self.subject_id.unwrap_or_default(),
            season: self.se.unwrap_or(0),
            episode: self.ep.unwrap_or(0),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LandingResponse {
    pub genres: Vec<GenreBucket>,
    pub total_items: usize,
}
