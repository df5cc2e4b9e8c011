use backon::{ExponentialBuilder, Retryable};
use url::Url;

use super::UPSTREAM_BODY_PREVIEW_CHARS;
use crate::config::CatalogConfig;

pub struct TmdbApi;

impl TmdbApi {
    /// `base_url` joined with `segments`, tolerating a trailing slash on the base.
    pub fn endpoint(base_url: &Url, segments: &[&str]) -> Option<Url> {
        let mut url = base_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(segments);
        Some(url)
    }

    pub fn build_search_request(
        client: &reqwest::Client,
        cfg: &CatalogConfig,
        api_key: &str,
        query: &str,
    ) -> Result<reqwest::Request, reqwest::Error> {
        let url = Self::endpoint(&cfg.base_url, &["search", "multi"])
            .unwrap_or_else(|| cfg.base_url.clone());
        client
            .get(url)
            .query(&[
                ("api_key", api_key),
                ("query", query),
                ("include_adult", "false"),
                ("language", cfg.language.as_str()),
            ])
            .build()
    }

    pub fn build_external_ids_request(
        client: &reqwest::Client,
        base_url: &Url,
        api_key: &str,
        media_segment: &str,
        tmdb_id: u64,
    ) -> Result<reqwest::Request, reqwest::Error> {
        let id = tmdb_id.to_string();
        let url = Self::endpoint(base_url, &[media_segment, id.as_str(), "external_ids"])
            .unwrap_or_else(|| base_url.clone());
        client.get(url).query(&[("api_key", api_key)]).build()
    }

    /// Executes the search request, retrying transport errors and 5xx responses.
    pub async fn try_search(
        client: &reqwest::Client,
        cfg: &CatalogConfig,
        api_key: &str,
        query: &str,
        retry_policy: ExponentialBuilder,
    ) -> Result<reqwest::Response, reqwest::Error> {
        (|| async move {
            let req = Self::build_search_request(client, cfg, api_key, query)?;
            let resp = client.execute(req).await?;
            let status = resp.status();
            if !status.is_server_error() {
                return Ok(resp);
            }
            let Some(err) = resp.error_for_status_ref().err() else {
                return Ok(resp);
            };

            let body_preview = match resp.bytes().await {
                Ok(bytes) => {
                    let raw_body = String::from_utf8_lossy(&bytes);
                    format!("{:.len$}", raw_body, len = UPSTREAM_BODY_PREVIEW_CHARS)
                }
                Err(e) => format!("<failed to read body: {e}>"),
            };
            tracing::debug!(
                %status,
                body = %body_preview,
                "TMDB upstream server error (will retry)"
            );
            Err(err)
        })
        .retry(retry_policy)
        .await
    }
}
