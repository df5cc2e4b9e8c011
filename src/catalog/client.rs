use super::api::TmdbApi;
use crate::config::CatalogConfig;
use crate::error::WishlistError;
use crate::utils::logging::debug_pretty_json;
use backon::ExponentialBuilder;
use futures::future::join_all;
use mediawish_schema::{
    SearchResponse, SearchResult, TmdbExternalIds, TmdbSearchItem, TmdbSearchPage,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const MISSING_OVERVIEW: &str = "暂无简介";

/// TMDB search client: one ranked `search/multi` call, then concurrent IMDb id lookups.
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    cfg: Arc<CatalogConfig>,
    retry_policy: ExponentialBuilder,
}

impl CatalogClient {
    pub fn new(cfg: Arc<CatalogConfig>, client: reqwest::Client) -> Self {
        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(300))
            .with_max_times(cfg.retry_max_times)
            .with_jitter();

        Self {
            client,
            cfg,
            retry_policy,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.cfg
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, WishlistError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WishlistError::bad_request(
                "Missing search query parameter \"q\".",
            ));
        }
        let Some(api_key) = self.api_key() else {
            return Err(WishlistError::ServerMisconfigured("TMDB_API_KEY"));
        };

        let start = Instant::now();
        let resp = TmdbApi::try_search(&self.client, &self.cfg, api_key, query, self.retry_policy)
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(WishlistError::UpstreamStatus(status));
        }
        let page: TmdbSearchPage = resp.json().await?;

        debug_pretty_json("[TMDB] search/multi response", &page);

        let candidates: Vec<TmdbSearchItem> = page
            .results
            .into_iter()
            .filter(|item| item.media_type.as_path_segment().is_some())
            .take(self.cfg.max_results)
            .collect();

        let results = join_all(
            candidates
                .into_iter()
                .map(|item| self.enrich(api_key, item)),
        )
        .await;

        info!(
            query,
            total_results = page.total_results,
            returned = results.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "[TMDB] search completed"
        );

        Ok(SearchResponse {
            query: query.to_string(),
            results,
        })
    }

    async fn enrich(&self, api_key: &str, item: TmdbSearchItem) -> SearchResult {
        let imdb_id = self.fetch_imdb_id(api_key, &item).await;
        let media_type = item.media_type.as_path_segment().unwrap_or("movie");

        SearchResult {
            tmdb_id: item.id,
            media_type: media_type.to_string(),
            title: item.display_title().unwrap_or_default().to_string(),
            overview: item
                .overview
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| MISSING_OVERVIEW.to_string()),
            rating: item.vote_average,
            release_date: item.release_date().map(str::to_string),
            poster_path: item
                .poster_path
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(|p| format!("{}{}", self.cfg.image_base_url.trim_end_matches('/'), p)),
            imdb_id,
        }
    }

    /// Lookup failures degrade to `None`; they never fail the search.
    async fn fetch_imdb_id(&self, api_key: &str, item: &TmdbSearchItem) -> Option<String> {
        let segment = item.media_type.as_path_segment()?;
        let result = async {
            let req = TmdbApi::build_external_ids_request(
                &self.client,
                &self.cfg.base_url,
                api_key,
                segment,
                item.id,
            )?;
            let ids: TmdbExternalIds = self
                .client
                .execute(req)
                .await?
                .error_for_status()?
                .json()
                .await?;
            Ok::<_, reqwest::Error>(ids.imdb_id())
        }
        .await;

        match result {
            Ok(imdb_id) => imdb_id,
            Err(e) => {
                warn!(
                    tmdb_id = item.id,
                    media_type = segment,
                    error = %e,
                    "Failed to fetch IMDb id"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn client_with_key(api_key: Option<&str>) -> CatalogClient {
        let cfg = CatalogConfig {
            api_key: api_key.map(str::to_string),
            ..CatalogConfig::default()
        };
        CatalogClient::new(Arc::new(cfg), reqwest::Client::new())
    }

    #[tokio::test]
    async fn blank_api_key_counts_as_misconfigured() {
        for key in [None, Some(""), Some("   ")] {
            let client = client_with_key(key);
            assert!(!client.is_configured());

            let err = client.search("heat").await.expect_err("no usable api key");
            assert!(matches!(err, WishlistError::ServerMisconfigured("TMDB_API_KEY")));
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
        assert!(client_with_key(Some("k-test")).is_configured());
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_key_check() {
        let err = client_with_key(None)
            .search("  ")
            .await
            .expect_err("empty query");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
