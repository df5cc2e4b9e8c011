//! File-backed stores.
//!
//! Layout:
//! - `models.rs`: wishlist entries and the notification config record
//! - `file.rs`: whole-file JSON load / atomic replace
//! - `wishlist.rs`, `notify_config.rs`: one actor per backing file

mod file;
pub mod models;
pub mod notify_config;
pub mod wishlist;

pub use models::{
    CatalogId, LifecycleStage, MediaType, NewEntry, NotificationConfig, WishlistEntry,
};
pub use notify_config::NotifyConfigHandle;
pub use wishlist::WishlistHandle;

use crate::config::Config;
use crate::error::WishlistError;
use tracing::info;

/// Handles for every store the server uses.
#[derive(Clone)]
pub struct Stores {
    pub wishlist: WishlistHandle,
    pub notify_config: NotifyConfigHandle,
}

impl Stores {
    pub async fn spawn(cfg: &Config) -> Result<Self, WishlistError> {
        let wishlist_path = cfg.wishlist_path();
        let notify_config_path = cfg.notify_config_path();
        info!(
            wishlist_path = %wishlist_path.display(),
            notify_config_path = %notify_config_path.display(),
            "Spawning stores"
        );

        Ok(Self {
            wishlist: wishlist::spawn(wishlist_path).await?,
            notify_config: notify_config::spawn(notify_config_path).await?,
        })
    }
}
