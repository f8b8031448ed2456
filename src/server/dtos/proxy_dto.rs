use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::server::dtos::trimmed;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ImdbSearchQuery {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "Missing required query parameter: q"))]
    pub q: Option<String>,
}

/// which of the two is required depends on the endpoint, checked in the controller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArslanQuery {
    pub text: Option<String>,
    pub url: Option<String>,
}
