mod grouping;

pub use grouping::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Movie,
    Series,
}

impl MediaKind {
    /// accepts the names the ui and the upstreams use interchangeably
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" | "film" | "1" => Some(MediaKind::Movie),
            "series" | "tv" | "show" | "tvshow" | "2" => Some(MediaKind::Series),
            _ => None,
        }
    }

    /// moviebox subjectType
    pub fn subject_type(&self) -> i64 {
        match self {
            MediaKind::Movie => 1,
            MediaKind::Series => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }
}

/// a movie or show as the ui renders it, built once from upstream data and never touched again
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub kind: MediaKind,
    pub release_date: String,
    pub rating: Option<f64>,
    pub poster: String,
    pub genres: Vec<String>,
    pub detail_path: String,
}

/// one way to play something, either someone else's player in a frame or a url our own player
/// element can drive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamSource {
    Embed {
        provider: String,
        url: String,
        quality: String,
    },
    Direct {
        format: String,
        resolution: String,
        size: String,
        duration: i64,
        codec: String,
        url: String,
    },
}

/// "Action,Drama / Sci-Fi" style genre strings into a clean list
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split([',', '/', '|'])
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}
