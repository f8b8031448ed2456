use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{ContentItem, MediaKind, StreamSource, split_genres};
use crate::server::error::AppResult;
use crate::upstream::{
    lenient_list, lenient_option, null_to_default, number_or_string, string_or_number,
};

/// every moviebox response is wrapped like { code, message, data }
///
/// nothing in here is trusted, missing fields fall back to empty so a half broken response still
/// renders an empty row instead of an error
#[derive(Debug, Clone, Deserialize)]
pub struct MovieBoxEnvelope<T> {
    #[serde(default, deserialize_with = "number_or_string")]
    pub code: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub message: String,
    pub data: Option<T>,
}

impl<T: DeserializeOwned + Default> MovieBoxEnvelope<T> {
    /// pull the typed payload out of a raw body, anything malformed becomes T::default()
    pub fn data_or_default(value: Value) -> T {
        serde_json::from_value::<MovieBoxEnvelope<T>>(value)
            .ok()
            .and_then(|envelope| envelope.data)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cover {
    #[serde(default, deserialize_with = "null_to_default")]
    pub url: String,
}

/// moviebox calls a movie or a show a "subject"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(default, deserialize_with = "string_or_number")]
    pub subject_id: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub subject_type: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub imdb_rating_value: String,
    #[serde(default, deserialize_with = "lenient_option")]
    pub cover: Option<Cover>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub genre: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub detail_path: String,
}

impl Subject {
    pub fn kind(&self) -> MediaKind {
        if self.subject_type == MediaKind::Series.subject_type() {
            MediaKind::Series
        } else {
            MediaKind::Movie
        }
    }

    pub fn into_content_item(self) -> ContentItem {
        let kind = self.kind();
        let rating = self.imdb_rating_value.trim().parse::<f64>().ok();

        ContentItem {
            id: self.subject_id,
            title: self.title,
            kind,
            release_date: self.release_date,
            rating,
            poster: self.cover.map(|c| c.url).unwrap_or_default(),
            genres: split_genres(&self.genre),
            detail_path: self.detail_path,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    #[serde(default, deserialize_with = "null_to_default")]
    pub has_more: bool,
    #[serde(default, deserialize_with = "number_or_string")]
    pub page: i64,
    #[serde(default, deserialize_with = "number_or_string")]
    pub per_page: i64,
    #[serde(default, deserialize_with = "number_or_string")]
    pub total_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub items: Vec<Subject>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub pager: Option<Pager>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub subject_list: Vec<Subject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSection {
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub operating_list: Vec<HomeSection>,
}

impl HomeData {
    pub fn subjects(self) -> Vec<Subject> {
        self.operating_list
            .into_iter()
            .flat_map(|section| section.subjects)
            .collect()
    }
}

/// a directly playable file from the play endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayStream {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub format: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub url: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub resolutions: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub size: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub duration: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub codec_name: String,
}

impl PlayStream {
    pub fn into_source(self) -> StreamSource {
        StreamSource::Direct {
            format: self.format,
            resolution: self.resolutions,
            size: self.size,
            duration: self.duration,
            codec: self.codec_name,
            url: self.url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub streams: Vec<PlayStream>,
}

/// body of the upstream search POST, the route exposes it as query params
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub keyword: String,
    pub page: u32,
    pub per_page: u32,
    pub subject_type: i64,
}

/// body of the upstream filter POST, unset fields are left out so upstream applies its defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// season/episode are 0 for movies, that's what upstream expects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpisodeRef {
    pub subject_id: String,
    pub season: u32,
    pub episode: u32,
}

pub type DynMovieBoxRepository = Arc<dyn MovieBoxRepository + Send + Sync>;

/// the raw moviebox surface, bodies come back exactly as upstream sent them
#[automock]
#[async_trait]
pub trait MovieBoxRepository {
    async fn home(&self) -> AppResult<Value>;
    async fn search(&self, request: &SearchRequest) -> AppResult<Value>;
    async fn trending(&self, page: u32, per_page: u32) -> AppResult<Value>;
    async fn filter(&self, request: &FilterRequest) -> AppResult<Value>;
    async fn detail(&self, subject_id: &str) -> AppResult<Value>;
    async fn stream_domain(&self) -> AppResult<Value>;
    async fn everyone_search(&self) -> AppResult<Value>;
    async fn play(&self, episode: &EpisodeRef) -> AppResult<Value>;
    async fn download(&self, episode: &EpisodeRef) -> AppResult<Value>;
}
