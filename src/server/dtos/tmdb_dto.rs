use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::server::dtos::trimmed;

// tmdb refuses anything past page 500
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, max = 500, message = "page must be between 1 and 500"))]
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DiscoverQuery {
    /// tmdb genre id list, "28" or "28,12"
    pub genre: Option<String>,

    #[validate(range(min = 1, max = 500, message = "page must be between 1 and 500"))]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TmdbSearchQuery {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "Missing required query parameter: query"))]
    pub query: Option<String>,

    #[validate(range(min = 1, max = 500, message = "page must be between 1 and 500"))]
    pub page: Option<u32>,
}
