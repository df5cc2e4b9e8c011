use crate::config::deserialize_opt_string_lax;
use crate::error::WishlistError;
use crate::notifier::dispatch_added;
use crate::server::guards::admin::{AdminGated, AdminJson};
use crate::server::router::WishlistState;
use crate::store::{CatalogId, LifecycleStage, MediaType, NewEntry, WishlistEntry};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use mediawish_schema::{MessageBody, RemovedBody};
use serde::Deserialize;

/// Every field is optional here so a missing one maps to our own 400 message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryRequest {
    #[serde(default, alias = "tmdbId")]
    pub catalog_id: Option<CatalogId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default, alias = "imdbId")]
    pub external_id: Option<String>,
}

impl TryFrom<AddEntryRequest> for NewEntry {
    type Error = WishlistError;

    fn try_from(req: AddEntryRequest) -> Result<Self, Self::Error> {
        match (req.catalog_id, req.title, req.media_type) {
            (Some(catalog_id), Some(title), Some(media_type)) => {
                Ok(NewEntry::new(catalog_id, title, media_type, req.external_id))
            }
            _ => Err(WishlistError::bad_request(
                "catalogId, title, and mediaType are required.",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub password: Option<String>,
}

impl AdminGated for PasswordRequest {
    fn admin_password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveManyRequest {
    #[serde(default)]
    pub ids: Option<Vec<CatalogId>>,
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub password: Option<String>,
}

impl AdminGated for RemoveManyRequest {
    fn admin_password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct StageRequest {
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub password: Option<String>,
}

impl AdminGated for StageRequest {
    fn admin_password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

/// GET /api/wishlist
pub async fn list_handler(
    State(state): State<WishlistState>,
) -> Result<Json<Vec<WishlistEntry>>, WishlistError> {
    Ok(Json(state.wishlist.list().await?))
}

/// POST /api/wishlist
///
/// On success the notifier is dispatched in the background; its outcome never affects
/// the response.
pub async fn add_handler(
    State(state): State<WishlistState>,
    payload: Result<Json<AddEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WishlistEntry>), WishlistError> {
    let Json(req) = payload?;
    let entry = state.wishlist.add(NewEntry::try_from(req)?).await?;

    dispatch_added(
        state.notifier.clone(),
        state.notify_config.clone(),
        entry.clone(),
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/wishlist/{id}
pub async fn remove_one_handler(
    State(state): State<WishlistState>,
    Path(id): Path<String>,
    AdminJson(_): AdminJson<PasswordRequest>,
) -> Result<Json<MessageBody>, WishlistError> {
    let id = CatalogId::new(id);
    if !state.wishlist.remove(id).await? {
        return Err(WishlistError::NotFound("Item not found.".to_string()));
    }
    Ok(Json(MessageBody::new("Item removed.")))
}

/// DELETE /api/wishlist
pub async fn remove_many_handler(
    State(state): State<WishlistState>,
    AdminJson(body): AdminJson<RemoveManyRequest>,
) -> Result<Json<RemovedBody>, WishlistError> {
    let ids: Vec<CatalogId> = body
        .ids
        .unwrap_or_default()
        .into_iter()
        .filter(|id| !id.is_empty())
        .collect();
    if ids.is_empty() {
        return Err(WishlistError::bad_request(
            "ids must be a non-empty array of catalog ids.",
        ));
    }

    let removed = state.wishlist.remove_many(ids).await?;
    if removed == 0 {
        return Err(WishlistError::NotFound(
            "None of the requested items were found.".to_string(),
        ));
    }

    Ok(Json(RemovedBody {
        message: format!("Removed {removed} item(s)."),
        removed,
    }))
}

/// POST /api/wishlist/clear
pub async fn clear_handler(
    State(state): State<WishlistState>,
    AdminJson(_): AdminJson<PasswordRequest>,
) -> Result<Json<MessageBody>, WishlistError> {
    state.wishlist.clear().await?;
    Ok(Json(MessageBody::new("Wishlist cleared.")))
}

/// POST /api/wishlist/{id}/stage
pub async fn stage_handler(
    State(state): State<WishlistState>,
    Path(id): Path<String>,
    AdminJson(body): AdminJson<StageRequest>,
) -> Result<Json<WishlistEntry>, WishlistError> {
    let stage: LifecycleStage = body
        .stage
        .as_deref()
        .ok_or_else(|| WishlistError::bad_request("stage is required."))?
        .parse()
        .map_err(WishlistError::BadRequest)?;

    let entry = state.wishlist.mark_stage(CatalogId::new(id), stage).await?;
    Ok(Json(entry))
}
