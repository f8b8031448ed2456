// landing page assembly on top of the raw moviebox lists
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::catalog::{ContentItem, LANDING_MIN_GENRE_ITEMS, group_by_genre, merge_unique};
use crate::server::dtos::moviebox_dto::LandingResponse;
use crate::server::error::AppResult;
use crate::upstream::moviebox::{DynMovieBoxRepository, HomeData, MovieBoxEnvelope, TrendingData};

pub type DynCatalogService = Arc<dyn CatalogServiceTrait + Send + Sync>;

// trending page size used for the landing merge
const LANDING_TRENDING_PER_PAGE: u32 = 30;

#[automock]
#[async_trait]
pub trait CatalogServiceTrait {
    async fn landing(&self) -> AppResult<LandingResponse>;
}

#[derive(Clone)]
pub struct CatalogService {
    moviebox: DynMovieBoxRepository,
}

impl CatalogService {
    pub fn new(moviebox: DynMovieBoxRepository) -> Self {
        Self { moviebox }
    }
}

#[async_trait]
impl CatalogServiceTrait for CatalogService {
    async fn landing(&self) -> AppResult<LandingResponse> {
        info!("building landing page genre rows");

        let (home, trending) = tokio::join!(
            self.moviebox.home(),
            self.moviebox.trending(1, LANDING_TRENDING_PER_PAGE)
        );

        // one list missing just means thinner rows, both missing is a real failure
        let (home, trending) = match (home, trending) {
            (Err(home_err), Err(_)) => return Err(home_err),
            (home, trending) => (
                home.inspect_err(|e| warn!("landing without home list: {}", e))
                    .ok(),
                trending
                    .inspect_err(|e| warn!("landing without trending list: {}", e))
                    .ok(),
            ),
        };

        let home_items: Vec<ContentItem> = home
            .map(|v| MovieBoxEnvelope::<HomeData>::data_or_default(v).subjects())
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.into_content_item())
            .collect();

        let trending_items: Vec<ContentItem> = trending
            .map(|v| MovieBoxEnvelope::<TrendingData>::data_or_default(v).subject_list)
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.into_content_item())
            .collect();

        let lists = [home_items, trending_items];
        let total_items = merge_unique(&lists).len();
        let genres = group_by_genre(&lists, LANDING_MIN_GENRE_ITEMS);

        info!("landing page has {} genre rows", genres.len());

        Ok(LandingResponse {
            genres,
            total_items,
        })
    }
}
