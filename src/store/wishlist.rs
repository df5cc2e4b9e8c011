use super::file::{load_or_init, write_atomic};
use super::models::{CatalogId, LifecycleStage, NewEntry, WishlistEntry};
use crate::error::{StorageError, WishlistError};
use ahash::AHashSet;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub enum WishlistMessage {
    /// Full sequence in insertion order.
    List(RpcReplyPort<Result<Vec<WishlistEntry>, WishlistError>>),

    /// Append unless the catalog id or external id is already present.
    Add(NewEntry, RpcReplyPort<Result<WishlistEntry, WishlistError>>),

    /// Remove every entry whose id is in the set; replies with the count removed.
    RemoveMany(AHashSet<CatalogId>, RpcReplyPort<Result<usize, WishlistError>>),

    /// Persist an empty sequence.
    Clear(RpcReplyPort<Result<(), WishlistError>>),

    /// Stamp (or reset) the lifecycle timestamps of one entry.
    MarkStage(
        CatalogId,
        LifecycleStage,
        RpcReplyPort<Result<WishlistEntry, WishlistError>>,
    ),
}

/// Cloneable handle to the wishlist actor.
///
/// The actor processes one message at a time, so every read-modify-write cycle on the
/// backing file runs to completion before the next one starts.
#[derive(Clone)]
pub struct WishlistHandle {
    actor: ActorRef<WishlistMessage>,
}

impl WishlistHandle {
    pub async fn list(&self) -> Result<Vec<WishlistEntry>, WishlistError> {
        ractor::call!(self.actor, WishlistMessage::List).map_err(|e| {
            StorageError::RactorError(format!("WishlistActor List RPC failed: {e}"))
        })?
    }

    pub async fn add(&self, entry: NewEntry) -> Result<WishlistEntry, WishlistError> {
        ractor::call!(self.actor, WishlistMessage::Add, entry).map_err(|e| {
            StorageError::RactorError(format!("WishlistActor Add RPC failed: {e}"))
        })?
    }

    pub async fn remove_many<I>(&self, ids: I) -> Result<usize, WishlistError>
    where
        I: IntoIterator<Item = CatalogId>,
    {
        let ids: AHashSet<CatalogId> = ids.into_iter().filter(|id| !id.is_empty()).collect();
        if ids.is_empty() {
            return Ok(0);
        }
        ractor::call!(self.actor, WishlistMessage::RemoveMany, ids).map_err(|e| {
            StorageError::RactorError(format!("WishlistActor RemoveMany RPC failed: {e}"))
        })?
    }

    pub async fn remove(&self, id: CatalogId) -> Result<bool, WishlistError> {
        Ok(self.remove_many([id]).await? > 0)
    }

    pub async fn clear(&self) -> Result<(), WishlistError> {
        ractor::call!(self.actor, WishlistMessage::Clear).map_err(|e| {
            StorageError::RactorError(format!("WishlistActor Clear RPC failed: {e}"))
        })?
    }

    pub async fn mark_stage(
        &self,
        id: CatalogId,
        stage: LifecycleStage,
    ) -> Result<WishlistEntry, WishlistError> {
        ractor::call!(self.actor, WishlistMessage::MarkStage, id, stage).map_err(|e| {
            StorageError::RactorError(format!("WishlistActor MarkStage RPC failed: {e}"))
        })?
    }
}

struct WishlistActorState {
    path: PathBuf,
}

struct WishlistActor;

#[ractor::async_trait]
impl Actor for WishlistActor {
    type Msg = WishlistMessage;
    type State = WishlistActorState;
    type Arguments = PathBuf;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        path: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!(path = %path.display(), "WishlistActor initialized");
        Ok(WishlistActorState { path })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let path = state.path.as_path();
        match message {
            WishlistMessage::List(reply) => {
                let res = read_entries(path).await;
                let _ = reply.send(res);
            }
            WishlistMessage::Add(entry, reply) => {
                let res = add_entry(path, entry).await;
                let _ = reply.send(res);
            }
            WishlistMessage::RemoveMany(ids, reply) => {
                let res = remove_entries(path, &ids).await;
                let _ = reply.send(res);
            }
            WishlistMessage::Clear(reply) => {
                let res = write_atomic(path, &Vec::<WishlistEntry>::new())
                    .await
                    .map_err(WishlistError::from);
                if res.is_ok() {
                    info!("Wishlist cleared");
                }
                let _ = reply.send(res);
            }
            WishlistMessage::MarkStage(id, stage, reply) => {
                let res = mark_stage(path, &id, stage).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

async fn read_entries(path: &Path) -> Result<Vec<WishlistEntry>, WishlistError> {
    Ok(load_or_init::<Vec<WishlistEntry>>(path).await?)
}

async fn add_entry(path: &Path, entry: NewEntry) -> Result<WishlistEntry, WishlistError> {
    let entry = entry.normalized().map_err(WishlistError::bad_request)?;
    let mut entries = read_entries(path).await?;

    if entries.iter().any(|existing| existing.collides_with(&entry)) {
        debug!(catalog_id = %entry.catalog_id, "Duplicate wishlist entry rejected");
        return Err(WishlistError::Conflict(
            "Item is already in the wishlist.".to_string(),
        ));
    }

    let stored = entry.into_entry(Utc::now());
    entries.push(stored.clone());
    write_atomic(path, &entries).await?;

    info!(
        catalog_id = %stored.catalog_id,
        media_type = stored.media_type.label(),
        total = entries.len(),
        "Wishlist entry added"
    );
    Ok(stored)
}

async fn remove_entries(path: &Path, ids: &AHashSet<CatalogId>) -> Result<usize, WishlistError> {
    let mut entries = read_entries(path).await?;
    let before = entries.len();
    entries.retain(|entry| !ids.contains(&entry.catalog_id));
    let removed = before - entries.len();

    if removed > 0 {
        write_atomic(path, &entries).await?;
        info!(requested = ids.len(), removed, "Wishlist entries removed");
    }
    Ok(removed)
}

async fn mark_stage(
    path: &Path,
    id: &CatalogId,
    stage: LifecycleStage,
) -> Result<WishlistEntry, WishlistError> {
    let mut entries = read_entries(path).await?;
    let Some(entry) = entries.iter_mut().find(|entry| &entry.catalog_id == id) else {
        return Err(WishlistError::NotFound("Item not found.".to_string()));
    };
    entry.apply_stage(stage, Utc::now());
    let updated = entry.clone();

    write_atomic(path, &entries).await?;
    info!(catalog_id = %id, stage = ?stage, "Wishlist entry stage updated");
    Ok(updated)
}

/// Spawn the wishlist actor over the JSON file at `path` and return a cloneable handle.
pub async fn spawn(path: impl Into<PathBuf>) -> Result<WishlistHandle, WishlistError> {
    let (actor, _jh) = Actor::spawn(None, WishlistActor, path.into())
        .await
        .map_err(|e| StorageError::RactorError(format!("WishlistActor spawn failed: {e}")))?;

    Ok(WishlistHandle { actor })
}
