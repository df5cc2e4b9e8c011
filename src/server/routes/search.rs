use crate::error::WishlistError;
use crate::server::router::WishlistState;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use mediawish_schema::SearchResponse;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/search?q=
pub async fn search_handler(
    State(state): State<WishlistState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, WishlistError> {
    let Query(params) = params?;
    let query = params.q.unwrap_or_default();
    Ok(Json(state.catalog.search(&query).await?))
}
