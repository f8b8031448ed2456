use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::{
    config::AppConfig,
    server::{
        services::{catalog_services::CatalogService, source_services::SourceService},
        utils::retry_utils::RetryPolicy,
    },
    upstream::{
        CachedTokenProvider, DynTokenProvider, MovieBoxTokenSource, UpstreamConnection,
        arslan::{ArslanHttpRepository, DynArslanRepository},
        imdb::{DynImdbRepository, ImdbHttpRepository},
        moviebox::{DynMovieBoxRepository, MovieBoxHttpRepository},
        showbox::{DynShowboxRepository, ShowboxHttpRepository},
        tmdb::{DynTmdbRepository, TmdbHttpRepository},
    },
};

use self::{catalog_services::DynCatalogService, source_services::DynSourceService};

pub mod catalog_services;
pub mod source_services;

// everything the handlers can reach, cloned into every request through an Extension
#[derive(Clone)]
pub struct Services {
    pub tokens: DynTokenProvider,
    pub tmdb: DynTmdbRepository,
    pub moviebox: DynMovieBoxRepository,
    pub imdb: DynImdbRepository,
    pub arslan: DynArslanRepository,
    pub catalog: DynCatalogService,
    pub sources: DynSourceService,
    pub config: Arc<AppConfig>,
}

/// the upstream facing pieces, split out so tests can hand in mocks
pub struct UpstreamParts {
    pub tokens: DynTokenProvider,
    pub tmdb: DynTmdbRepository,
    pub moviebox: DynMovieBoxRepository,
    pub imdb: DynImdbRepository,
    pub arslan: DynArslanRepository,
    pub showbox: DynShowboxRepository,
}

impl Services {
    pub fn new(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        info!("starting upstream clients...");

        let connection = Arc::new(UpstreamConnection::connect(Duration::from_secs(
            config.http_timeout_secs,
        ))?);

        let token_source = Arc::new(MovieBoxTokenSource::new(
            connection.clone(),
            &config.moviebox_base_url,
        ));
        let tokens = Arc::new(CachedTokenProvider::new(
            token_source,
            Duration::from_secs(config.token_ttl_secs),
        )) as DynTokenProvider;

        let parts = UpstreamParts {
            tmdb: Arc::new(TmdbHttpRepository::new(
                connection.clone(),
                &config.tmdb_base_url,
                &config.tmdb_api_key,
            )) as DynTmdbRepository,
            moviebox: Arc::new(MovieBoxHttpRepository::new(
                connection.clone(),
                tokens.clone(),
                &config.moviebox_base_url,
            )) as DynMovieBoxRepository,
            imdb: Arc::new(ImdbHttpRepository::new(
                connection.clone(),
                &config.imdb_base_url,
            )) as DynImdbRepository,
            arslan: Arc::new(ArslanHttpRepository::new(
                connection.clone(),
                &config.arslan_base_url,
            )) as DynArslanRepository,
            showbox: Arc::new(ShowboxHttpRepository::new(
                connection,
                &config.showbox_base_url,
            )) as DynShowboxRepository,
            tokens,
        };

        info!("upstream clients ok, starting services...");

        Ok(Self::from_parts(config, parts))
    }

    pub fn from_parts(config: Arc<AppConfig>, parts: UpstreamParts) -> Self {
        let retry = RetryPolicy::new(
            config.source_retry_attempts,
            Duration::from_millis(config.source_retry_backoff_ms),
        );

        let catalog = Arc::new(CatalogService::new(parts.moviebox.clone())) as DynCatalogService;
        let sources = Arc::new(SourceService::new(
            parts.showbox,
            parts.moviebox.clone(),
            retry,
        )) as DynSourceService;

        Self {
            tokens: parts.tokens,
            tmdb: parts.tmdb,
            moviebox: parts.moviebox,
            imdb: parts.imdb,
            arslan: parts.arslan,
            catalog,
            sources,
            config,
        }
    }
}
