use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

use crate::server::error::AppResult;

/// which query parameter an endpoint takes, searches take free text, the rest take a page url
/// from a previous search result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArslanParam {
    Text,
    Url,
}

impl ArslanParam {
    pub fn name(&self) -> &'static str {
        match self {
            ArslanParam::Text => "text",
            ArslanParam::Url => "url",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArslanEndpoint {
    pub source: &'static str,
    pub action: &'static str,
    pub param: ArslanParam,
    pub path: &'static str,
}

pub const ARSLAN_ENDPOINTS: &[ArslanEndpoint] = &[
    ArslanEndpoint {
        source: "sinhalasub",
        action: "search",
        param: ArslanParam::Text,
        path: "/movie/sinhalasub/search",
    },
    ArslanEndpoint {
        source: "sinhalasub",
        action: "movie",
        param: ArslanParam::Url,
        path: "/movie/sinhalasub/movie",
    },
    ArslanEndpoint {
        source: "sinhalasub",
        action: "tvshow",
        param: ArslanParam::Url,
        path: "/movie/sinhalasub/tvshow",
    },
    ArslanEndpoint {
        source: "sinhalasub",
        action: "episode",
        param: ArslanParam::Url,
        path: "/movie/sinhalasub/episode",
    },
    ArslanEndpoint {
        source: "pirate",
        action: "search",
        param: ArslanParam::Text,
        path: "/movie/pirate/search",
    },
    ArslanEndpoint {
        source: "pirate",
        action: "movie",
        param: ArslanParam::Url,
        path: "/movie/pirate/movie",
    },
];

impl ArslanEndpoint {
    pub fn find(source: &str, action: &str) -> Option<&'static ArslanEndpoint> {
        ARSLAN_ENDPOINTS
            .iter()
            .find(|e| e.source == source && e.action == action)
    }
}

pub type DynArslanRepository = Arc<dyn ArslanRepository + Send + Sync>;

#[automock]
#[async_trait]
pub trait ArslanRepository {
    async fn fetch(&self, endpoint: &ArslanEndpoint, value: &str) -> AppResult<Value>;
}
