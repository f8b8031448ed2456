pub mod arslan_controller;
pub mod health_controller;
pub mod imdb_controller;
pub mod moviebox_controller;
pub mod tmdb_controller;
pub mod watch_controller;

pub async fn health() -> &'static str {
    "server is ok i think"
}
