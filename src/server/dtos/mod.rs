use serde::{Deserialize, Deserializer};

pub mod health_dto;
pub mod moviebox_dto;
pub mod proxy_dto;
pub mod tmdb_dto;
pub mod watch_dto;

/// trims query text and treats a blank value like a missing one, so `required` catches `?q=%20`
pub fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}
