// drives the watch source machine against the real lookups
//
// embed links come from the showbox provider, direct streams from moviebox: search the title,
// pick the closest subject, then ask for its play streams. both lookups get the configured fixed
// retries, nothing else in the api retries
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info, warn};

use crate::catalog::{MediaKind, StreamSource};
use crate::server::dtos::watch_dto::ResolveRequest;
use crate::server::error::AppResult;
use crate::server::utils::retry_utils::{RetryPolicy, retry_fixed};
use crate::upstream::moviebox::{
    DynMovieBoxRepository, EpisodeRef, MovieBoxEnvelope, PlayData, SearchData, SearchRequest,
    Subject,
};
use crate::upstream::showbox::{DynShowboxRepository, EmbedQuery};
use crate::watch::{Source, WatchEvent, WatchState, WatchSubject};

pub type DynSourceService = Arc<dyn SourceServiceTrait + Send + Sync>;

// how many search hits we look through for a title match
const SEARCH_PER_PAGE: u32 = 10;

#[automock]
#[async_trait]
pub trait SourceServiceTrait {
    async fn resolve(&self, request: ResolveRequest) -> AppResult<WatchState>;
}

#[derive(Clone)]
pub struct SourceService {
    showbox: DynShowboxRepository,
    moviebox: DynMovieBoxRepository,
    retry: RetryPolicy,
}

impl SourceService {
    pub fn new(
        showbox: DynShowboxRepository,
        moviebox: DynMovieBoxRepository,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            showbox,
            moviebox,
            retry,
        }
    }

    /// runs lookups until the machine stops asking for one
    async fn settle(&self, mut state: WatchState, request: &ResolveRequest) -> WatchState {
        while let Some(source) = state.pending_lookup() {
            let event = match source {
                Source::Embed => match self.embed_links(request).await {
                    Ok(links) => WatchEvent::EmbedLoaded(links),
                    Err(e) => {
                        warn!("embed lookup for {:?} failed: {}", request.title, e);
                        WatchEvent::EmbedFailed
                    }
                },
                Source::Direct => match self.direct_streams(request).await {
                    Ok(streams) => WatchEvent::DirectLoaded(streams),
                    Err(e) => {
                        warn!("direct lookup for {:?} failed: {}", request.title, e);
                        WatchEvent::DirectFailed
                    }
                },
            };
            state = state.apply(event);
        }
        state
    }

    async fn embed_links(&self, request: &ResolveRequest) -> AppResult<Vec<StreamSource>> {
        let query = EmbedQuery {
            title: request.title.clone(),
            kind: request.kind,
            season: request.season,
            episode: request.episode,
        };

        let links = retry_fixed(self.retry, "embed lookup", || self.showbox.links(&query)).await?;

        Ok(links.into_iter().map(|l| l.into_source()).collect())
    }

    async fn direct_streams(&self, request: &ResolveRequest) -> AppResult<Vec<StreamSource>> {
        let subject_id = match &request.subject_id {
            Some(id) => id.clone(),
            None => match self.find_subject(request).await? {
                Some(subject) => subject.subject_id,
                None => {
                    info!("moviebox has nothing matching {:?}", request.title);
                    return Ok(Vec::new());
                }
            },
        };

        // movies are season 0 episode 0 upstream
        let episode = EpisodeRef {
            subject_id,
            season: request.season.unwrap_or(0),
            episode: request.episode.unwrap_or(0),
        };

        let body = retry_fixed(self.retry, "direct stream lookup", || {
            self.moviebox.play(&episode)
        })
        .await?;

        let streams: Vec<StreamSource> = MovieBoxEnvelope::<PlayData>::data_or_default(body)
            .streams
            .into_iter()
            .filter(|s| !s.url.is_empty())
            .map(|s| s.into_source())
            .collect();

        debug!(
            "{} direct streams for subject {}",
            streams.len(),
            episode.subject_id
        );

        Ok(streams)
    }

    async fn find_subject(&self, request: &ResolveRequest) -> AppResult<Option<Subject>> {
        let search = SearchRequest {
            keyword: request.title.clone(),
            page: 1,
            per_page: SEARCH_PER_PAGE,
            subject_type: request.kind.subject_type(),
        };

        let body = retry_fixed(self.retry, "direct title search", || {
            self.moviebox.search(&search)
        })
        .await?;

        let items = MovieBoxEnvelope::<SearchData>::data_or_default(body).items;

        Ok(best_match(&request.title, request.kind, items))
    }
}

#[async_trait]
impl SourceServiceTrait for SourceService {
    async fn resolve(&self, request: ResolveRequest) -> AppResult<WatchState> {
        info!(
            "resolving sources for {:?} ({}) s{:?}e{:?}",
            request.title,
            request.kind.as_str(),
            request.season,
            request.episode
        );

        let subject = WatchSubject {
            key: request.subject_key(),
            season: request.season,
            episode: request.episode,
        };

        let state = WatchState::new(subject).apply(WatchEvent::Start);
        let mut state = self.settle(state, &request).await;

        if let Some(source) = request.source {
            state = self
                .settle(state.apply(WatchEvent::SwitchSource(source)), &request)
                .await;
        }

        if let Some(index) = request.index {
            state = state.apply(WatchEvent::Select(index));
        }

        Ok(state)
    }
}

/// lowercase alphanumerics only, so "Spider-Man: No Way Home" == "spider man no way home"
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// exact normalized title of the right kind, then anything of the right kind, then the first hit
pub fn best_match(title: &str, kind: MediaKind, items: Vec<Subject>) -> Option<Subject> {
    let wanted = normalize_title(title);
    let items: Vec<Subject> = items
        .into_iter()
        .filter(|s| !s.subject_id.is_empty())
        .collect();

    let exact = items
        .iter()
        .position(|s| s.kind() == kind && normalize_title(&s.title) == wanted);
    let same_kind = items.iter().position(|s| s.kind() == kind);

    let index = exact.or(same_kind).or(if items.is_empty() { None } else { Some(0) })?;

    items.into_iter().nth(index)
}
