use axum::extract::{Json, Path, Query};
use axum::routing::get;
use axum::{Extension, Router};
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::server::dtos::proxy_dto::ArslanQuery;
use crate::server::error::{AppResult, Error};
use crate::server::services::Services;
use crate::upstream::arslan::{ArslanEndpoint, ArslanParam};

pub struct ArslanController;

impl ArslanController {
    pub fn app() -> Router {
        Router::new().route("/{source}/{action}", get(Self::proxy_endpoint))
    }

    /// GET /api/arslan/{sinhalasub|pirate}/{action}?text= or ?url=
    pub async fn proxy_endpoint(
        Extension(services): Extension<Services>,
        Path((source, action)): Path<(String, String)>,
        Query(query): Query<ArslanQuery>,
    ) -> AppResult<Json<Value>> {
        let endpoint = ArslanEndpoint::find(&source, &action).ok_or_else(|| {
            Error::NotFound(format!("Unknown arslan endpoint: {}/{}", source, action))
        })?;

        let value = required_param(endpoint, &query)?;
        info!("arslan {}/{}", endpoint.source, endpoint.action);

        let body = services.arslan.fetch(endpoint, &value).await?;
        Ok(Json(body))
    }
}

/// pulls the one parameter the endpoint wants, urls have to be absolute http(s) links
fn required_param(endpoint: &ArslanEndpoint, query: &ArslanQuery) -> AppResult<String> {
    let raw = match endpoint.param {
        ArslanParam::Text => query.text.as_deref(),
        ArslanParam::Url => query.url.as_deref(),
    }
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .ok_or_else(|| Error::missing_param(endpoint.param.name()))?;

    if endpoint.param == ArslanParam::Url {
        let parsed = Url::parse(raw)
            .map_err(|_| Error::BadRequest(format!("Invalid url parameter: {}", raw)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::BadRequest(format!("Invalid url parameter: {}", raw)));
        }
    }

    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(text: Option<&str>, url: Option<&str>) -> ArslanQuery {
        ArslanQuery {
            text: text.map(str::to_string),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_search_needs_text() {
        let endpoint = ArslanEndpoint::find("pirate", "search").unwrap();

        assert!(required_param(endpoint, &query(None, Some("https://x.io"))).is_err());
        assert!(required_param(endpoint, &query(Some("  "), None)).is_err());
        assert_eq!(
            required_param(endpoint, &query(Some(" dune "), None)).unwrap(),
            "dune"
        );
    }

    #[test]
    fn test_movie_needs_absolute_url() {
        let endpoint = ArslanEndpoint::find("sinhalasub", "movie").unwrap();

        assert!(required_param(endpoint, &query(Some("dune"), None)).is_err());
        assert!(required_param(endpoint, &query(None, Some("not a url"))).is_err());
        assert!(required_param(endpoint, &query(None, Some("ftp://host/file"))).is_err());
        let page = query(None, Some("https://sinhalasub.lk/movies/dune/"));
        assert!(required_param(endpoint, &page).is_ok());
    }
}
