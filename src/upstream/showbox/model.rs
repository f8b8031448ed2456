use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::catalog::{MediaKind, StreamSource};
use crate::server::error::AppResult;
use crate::upstream::{null_to_default, parse_items, string_or_number};

/// one embeddable player page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmbedLink {
    #[serde(
        default,
        alias = "name",
        alias = "server",
        deserialize_with = "null_to_default"
    )]
    pub provider: String,
    #[serde(
        default,
        alias = "link",
        alias = "embed",
        deserialize_with = "null_to_default"
    )]
    pub url: String,
    #[serde(default, alias = "label", deserialize_with = "string_or_number")]
    pub quality: String,
}

impl EmbedLink {
    pub fn into_source(self) -> StreamSource {
        StreamSource::Embed {
            provider: self.provider,
            url: self.url,
            quality: self.quality,
        }
    }
}

// the list shows up bare or wrapped under links/data/results depending on which mirror answers.
// a body with no usable list is an empty list, the resolver treats that as "nothing here" and
// moves on to direct streams
const WRAPPER_KEYS: [&str; 3] = ["links", "data", "results"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedLinksResponse {
    links: Vec<EmbedLink>,
}

impl<'de> Deserialize<'de> for EmbedLinksResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = match Value::deserialize(deserializer)? {
            Value::Object(mut body) => WRAPPER_KEYS
                .iter()
                .filter_map(|key| body.remove(*key))
                .find(Value::is_array)
                .unwrap_or_default(),
            other => other,
        };

        Ok(Self {
            links: parse_items(list),
        })
    }
}

impl EmbedLinksResponse {
    /// drops entries without a url, there's nothing to put in the frame
    pub fn into_links(self) -> Vec<EmbedLink> {
        self.links
            .into_iter()
            .filter(|l| !l.url.trim().is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedQuery {
    pub title: String,
    pub kind: MediaKind,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

pub type DynShowboxRepository = Arc<dyn ShowboxRepository + Send + Sync>;

#[automock]
#[async_trait]
pub trait ShowboxRepository {
    async fn links(&self, query: &EmbedQuery) -> AppResult<Vec<EmbedLink>>;
}
