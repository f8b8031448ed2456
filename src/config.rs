#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum CargoEnv {
    Development,
    Production,
}

#[derive(clap::Parser, Debug, Clone)]
pub struct AppConfig {
    #[clap(long, env, value_enum, default_value = "development")]
    pub cargo_env: CargoEnv,

    #[clap(long, env, default_value = "5000")]
    pub port: u16,

    // "*" lets every origin through, otherwise a host suffix like "wolfstream.app"
    #[clap(long, env, default_value = "*")]
    pub cors_origin: String,

    #[clap(long, env, default_value = "https://api.themoviedb.org/3")]
    pub tmdb_base_url: String,

    #[clap(long, env, default_value = "")]
    pub tmdb_api_key: String,

    #[clap(long, env, default_value = "https://h5.aoneroom.com")]
    pub moviebox_base_url: String,

    #[clap(long, env, default_value = "https://api.imdbapi.dev")]
    pub imdb_base_url: String,

    #[clap(long, env, default_value = "https://api.arslan-apis.xyz")]
    pub arslan_base_url: String,

    #[clap(long, env, default_value = "https://showbox.wolfstream.app")]
    pub showbox_base_url: String,

    /// how long a moviebox token is trusted, counted from when we fetched it
    #[clap(long, env, default_value = "3600")]
    pub token_ttl_secs: u64,

    /// per upstream call
    #[clap(long, env, default_value = "30")]
    pub http_timeout_secs: u64,

    /// whole request, has to cover the watch resolver retrying both lookups
    #[clap(long, env, default_value = "90")]
    pub request_timeout_secs: u64,

    #[clap(long, env, default_value = "50")]
    pub rate_limit_per_second: u64,

    /// extra attempts for the two watch page lookups, metadata never retries
    #[clap(long, env, default_value = "2")]
    pub source_retry_attempts: u32,

    #[clap(long, env, default_value = "1000")]
    pub source_retry_backoff_ms: u64,

    #[clap(long, env)]
    pub sentry_dsn: Option<String>,
}
