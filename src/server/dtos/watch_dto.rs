use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::{MediaKind, StreamSource};
use crate::server::dtos::trimmed;
use crate::server::error::Error;
use crate::server::services::source_services::normalize_title;
use crate::watch::{Source, WatchState};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WatchSourcesQuery {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "Missing required query parameter: title"))]
    pub title: Option<String>,

    /// movie or series, movie when missing
    pub kind: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,

    /// skips the moviebox title search when the page already knows the subject
    pub subject_id: Option<String>,

    /// embed or direct, applied as a manual switch after the first resolution
    pub source: Option<String>,
    pub index: Option<usize>,
}

/// everything the resolver needs, already checked
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    pub title: String,
    pub kind: MediaKind,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub subject_id: Option<String>,
    pub source: Option<Source>,
    pub index: Option<usize>,
}

impl ResolveRequest {
    /// what identifies "the same thing being watched" for selection resets
    pub fn subject_key(&self) -> String {
        match &self.subject_id {
            Some(id) => format!("moviebox:{}", id),
            None => format!("{}:{}", self.kind.as_str(), normalize_title(&self.title)),
        }
    }
}

impl TryFrom<WatchSourcesQuery> for ResolveRequest {
    type Error = Error;

    fn try_from(query: WatchSourcesQuery) -> Result<Self, Self::Error> {
        let kind = match query.kind.as_deref() {
            None | Some("") => MediaKind::Movie,
            Some(raw) => MediaKind::parse(raw)
                .ok_or_else(|| Error::BadRequest(format!("Unknown media kind: {}", raw)))?,
        };

        let source = match query.source.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                Source::parse(raw)
                    .ok_or_else(|| Error::BadRequest(format!("Unknown source: {}", raw)))?,
            ),
        };

        // series without an explicit episode start at s1e1, same as the player
        let (season, episode) = match kind {
            MediaKind::Movie => (None, None),
            MediaKind::Series => (
                Some(query.season.unwrap_or(1)),
                Some(query.episode.unwrap_or(1)),
            ),
        };

        Ok(Self {
            title: query.title.unwrap_or_default().trim().to_string(),
            kind,
            season,
            episode,
            subject_id: query.subject_id.filter(|id| !id.is_empty()),
            source,
            index: query.index,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WatchSourcesResponse {
    #[serde(flatten)]
    pub state: WatchState,
    pub loading: bool,
    pub current: Option<StreamSource>,
}

impl From<WatchState> for WatchSourcesResponse {
    fn from(state: WatchState) -> Self {
        Self {
            loading: state.is_loading(),
            current: state.selected_source().cloned(),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(kind: Option<&str>) -> WatchSourcesQuery {
        WatchSourcesQuery {
            title: Some(" Severance ".to_string()),
            kind: kind.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_series_defaults_to_first_episode() {
        let request = ResolveRequest::try_from(query(Some("tv"))).unwrap();

        assert_eq!(request.kind, MediaKind::Series);
        assert_eq!((request.season, request.episode), (Some(1), Some(1)));
        assert_eq!(request.title, "Severance");
        assert_eq!(request.subject_key(), "series:severance");
    }

    #[test]
    fn test_movie_drops_episode_fields() {
        let mut q = query(None);
        q.season = Some(3);

        let request = ResolveRequest::try_from(q).unwrap();

        assert_eq!(request.kind, MediaKind::Movie);
        assert_eq!(request.season, None);
    }

    #[test]
    fn test_rejects_unknown_kind_and_source() {
        assert!(ResolveRequest::try_from(query(Some("novel"))).is_err());

        let mut q = query(None);
        q.source = Some("torrent".to_string());
        assert!(ResolveRequest::try_from(q).is_err());
    }
}
