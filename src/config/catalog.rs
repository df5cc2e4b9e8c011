use serde::{Deserialize, Serialize};
use url::Url;

/// TMDB catalog client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// TMDB v3 API key. TOML: `catalog.api_key`. Env: `TMDB_API_KEY`.
    /// Search answers 500 while this is unset.
    #[serde(default, deserialize_with = "super::deserialize_opt_string_lax")]
    pub api_key: Option<String>,

    /// TOML: `catalog.base_url`. Default: `https://api.themoviedb.org/3`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Prefix joined with TMDB `poster_path` values.
    /// TOML: `catalog.image_base_url`. Default: `https://image.tmdb.org/t/p/w500`.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// TOML: `catalog.language`. Default: `zh-CN`.
    #[serde(default = "default_language")]
    pub language: String,

    /// Candidates returned per search. TOML: `catalog.max_results`. Default: `10`.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Whole-request timeout in seconds. TOML: `catalog.timeout_secs`. Default: `10`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts for the search call on transport errors or 5xx.
    /// TOML: `catalog.retry_max_times`. Default: `2`.
    #[serde(default = "default_retry_max_times")]
    pub retry_max_times: usize,

    /// Optional upstream HTTP proxy. TOML: `catalog.proxy`.
    #[serde(default)]
    pub proxy: Option<Url>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
            retry_max_times: default_retry_max_times(),
            proxy: None,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("https://api.themoviedb.org/3").expect("invalid fixed TMDB base URL")
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_language() -> String {
    "zh-CN".to_string()
}

fn default_max_results() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retry_max_times() -> usize {
    2
}
