use super::file::{load_or_init, write_atomic};
use super::models::NotificationConfig;
use crate::error::{StorageError, WishlistError};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub enum NotifyConfigMessage {
    Read(RpcReplyPort<Result<NotificationConfig, WishlistError>>),

    /// Overwrite the whole record.
    Write(NotificationConfig, RpcReplyPort<Result<(), WishlistError>>),
}

#[derive(Clone)]
pub struct NotifyConfigHandle {
    actor: ActorRef<NotifyConfigMessage>,
}

impl NotifyConfigHandle {
    pub async fn read(&self) -> Result<NotificationConfig, WishlistError> {
        ractor::call!(self.actor, NotifyConfigMessage::Read).map_err(|e| {
            StorageError::RactorError(format!("NotifyConfigActor Read RPC failed: {e}"))
        })?
    }

    pub async fn write(
        &self,
        account: Option<String>,
        credential: Option<String>,
    ) -> Result<(), WishlistError> {
        let config = NotificationConfig::new(account, credential);
        ractor::call!(self.actor, NotifyConfigMessage::Write, config).map_err(|e| {
            StorageError::RactorError(format!("NotifyConfigActor Write RPC failed: {e}"))
        })?
    }

    pub async fn is_configured(&self) -> Result<bool, WishlistError> {
        Ok(self.read().await?.is_configured())
    }
}

struct NotifyConfigActor;

#[ractor::async_trait]
impl Actor for NotifyConfigActor {
    type Msg = NotifyConfigMessage;
    type State = PathBuf;
    type Arguments = PathBuf;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        path: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!(path = %path.display(), "NotifyConfigActor initialized");
        Ok(path)
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        path: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            NotifyConfigMessage::Read(reply) => {
                let res = load_or_init::<NotificationConfig>(path)
                    .await
                    .map_err(WishlistError::from);
                let _ = reply.send(res);
            }
            NotifyConfigMessage::Write(config, reply) => {
                let configured = config.is_configured();
                let res = write_atomic(path, &config)
                    .await
                    .map_err(WishlistError::from);
                if res.is_ok() {
                    info!(configured, "Notification config saved");
                }
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

pub async fn spawn(path: impl Into<PathBuf>) -> Result<NotifyConfigHandle, WishlistError> {
    let (actor, _jh) = Actor::spawn(None, NotifyConfigActor, path.into())
        .await
        .map_err(|e| StorageError::RactorError(format!("NotifyConfigActor spawn failed: {e}")))?;

    Ok(NotifyConfigHandle { actor })
}
