use serde::{Deserialize, Serialize};

/// Body of `GET /api/search`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// A ranked catalog candidate, enriched with its IMDb id when TMDB knows it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub tmdb_id: u64,
    pub media_type: String,
    pub title: String,
    pub overview: String,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub imdb_id: Option<String>,
}
