use std::sync::Arc;

use clap::Parser;

use crate::config::AppConfig;
use crate::server::services::{Services, UpstreamParts};
use crate::upstream::arslan::MockArslanRepository;
use crate::upstream::imdb::MockImdbRepository;
use crate::upstream::moviebox::MockMovieBoxRepository;
use crate::upstream::showbox::MockShowboxRepository;
use crate::upstream::tmdb::MockTmdbRepository;
use crate::upstream::MockTokenProvider;

/// config for tests, every upstream pointed at `base_url` and no retry sleeps
pub fn test_config(base_url: &str) -> AppConfig {
    AppConfig::parse_from([
        "wolfstream-api",
        "--tmdb-base-url",
        base_url,
        "--tmdb-api-key",
        "test-key",
        "--moviebox-base-url",
        base_url,
        "--imdb-base-url",
        base_url,
        "--arslan-base-url",
        base_url,
        "--showbox-base-url",
        base_url,
        "--http-timeout-secs",
        "5",
        "--source-retry-attempts",
        "0",
        "--source-retry-backoff-ms",
        "0",
    ])
}

// one mock per upstream, tests set expectations on the ones they care about and hand the rest
// over untouched (an untouched mock panics if it gets called, which is what we want)
pub struct UpstreamTestFixture {
    pub mock_tokens: MockTokenProvider,
    pub mock_tmdb: MockTmdbRepository,
    pub mock_moviebox: MockMovieBoxRepository,
    pub mock_imdb: MockImdbRepository,
    pub mock_arslan: MockArslanRepository,
    pub mock_showbox: MockShowboxRepository,
}

impl Default for UpstreamTestFixture {
    fn default() -> Self {
        UpstreamTestFixture::new()
    }
}

impl UpstreamTestFixture {
    pub fn new() -> Self {
        Self {
            mock_tokens: MockTokenProvider::new(),
            mock_tmdb: MockTmdbRepository::new(),
            mock_moviebox: MockMovieBoxRepository::new(),
            mock_imdb: MockImdbRepository::new(),
            mock_arslan: MockArslanRepository::new(),
            mock_showbox: MockShowboxRepository::new(),
        }
    }

    pub fn into_services(self, config: AppConfig) -> Services {
        let parts = UpstreamParts {
            tokens: Arc::new(self.mock_tokens),
            tmdb: Arc::new(self.mock_tmdb),
            moviebox: Arc::new(self.mock_moviebox),
            imdb: Arc::new(self.mock_imdb),
            arslan: Arc::new(self.mock_arslan),
            showbox: Arc::new(self.mock_showbox),
        };

        Services::from_parts(Arc::new(config), parts)
    }
}
