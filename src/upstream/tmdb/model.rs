use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::server::error::AppResult;

/// tmdb splits everything by movie or tv in the path
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TmdbMedia {
    Movie,
    Tv,
}

impl TmdbMedia {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" | "movies" => Some(TmdbMedia::Movie),
            "tv" | "series" => Some(TmdbMedia::Tv),
            _ => None,
        }
    }

    pub fn as_path(&self) -> &'static str {
        match self {
            TmdbMedia::Movie => "movie",
            TmdbMedia::Tv => "tv",
        }
    }
}

/// trending also has "all", which is only valid there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingMedia {
    All,
    Only(TmdbMedia),
}

impl TrendingMedia {
    pub fn parse(value: &str) -> Option<Self> {
        if value == "all" {
            return Some(TrendingMedia::All);
        }
        TmdbMedia::parse(value).map(TrendingMedia::Only)
    }

    pub fn as_path(&self) -> &'static str {
        match self {
            TrendingMedia::All => "all",
            TrendingMedia::Only(media) => media.as_path(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "day" => Some(TimeWindow::Day),
            "week" => Some(TimeWindow::Week),
            _ => None,
        }
    }

    pub fn as_path(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

pub type DynTmdbRepository = Arc<dyn TmdbRepository + Send + Sync>;

#[automock]
#[async_trait]
pub trait TmdbRepository {
    async fn trending(
        &self,
        media: TrendingMedia,
        window: TimeWindow,
        page: u32,
    ) -> AppResult<Value>;
    async fn popular(&self, media: TmdbMedia, page: u32) -> AppResult<Value>;
    async fn top_rated(&self, media: TmdbMedia, page: u32) -> AppResult<Value>;
    async fn discover(
        &self,
        media: TmdbMedia,
        genre: Option<String>,
        page: u32,
    ) -> AppResult<Value>;
    async fn search(&self, query: &str, page: u32) -> AppResult<Value>;
    async fn genres(&self, media: TmdbMedia) -> AppResult<Value>;
    async fn detail(&self, media: TmdbMedia, id: u64) -> AppResult<Value>;
    async fn season(&self, tv_id: u64, season: u32) -> AppResult<Value>;
}
