//! Best-effort notifications on new wishlist entries.

mod relay;

pub use relay::RelayNotifier;

use crate::error::NotifyError;
use crate::store::{NotificationConfig, NotifyConfigHandle, WishlistEntry};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one "entry added" message using the stored account and credential.
    async fn notify_added(
        &self,
        config: &NotificationConfig,
        entry: &WishlistEntry,
    ) -> Result<(), NotifyError>;
}

/// Fire-and-forget delivery for a committed `entry`.
///
/// Reads the notification config, skips silently when it is incomplete, and logs any
/// delivery failure. Nothing is reported back to the caller and nothing is retried.
pub fn dispatch_added(
    notifier: Arc<dyn Notifier>,
    configs: NotifyConfigHandle,
    entry: WishlistEntry,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let config = match configs.read().await {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    catalog_id = %entry.catalog_id,
                    error = %e,
                    "Notification skipped: config unreadable"
                );
                return;
            }
        };
        if !config.is_configured() {
            debug!(catalog_id = %entry.catalog_id, "Notification skipped: not configured");
            return;
        }
        match notifier.notify_added(&config, &entry).await {
            Ok(()) => debug!(catalog_id = %entry.catalog_id, "Notification sent"),
            Err(e) => warn!(catalog_id = %entry.catalog_id, error = %e, "Notification failed"),
        }
    })
}

/// Message subject and body for an added entry.
pub(crate) fn compose_added_message(
    subject_prefix: &str,
    entry: &WishlistEntry,
) -> (String, String) {
    let subject = format!("{subject_prefix} New wishlist item: {}", entry.title)
        .trim()
        .to_string();
    let text = format!(
        "\"{}\" ({}) was added to the wishlist at {}.\nCatalog id: {}\nIMDb id: {}\n",
        entry.title,
        entry.media_type.label(),
        entry.created_at.to_rfc3339(),
        entry.catalog_id,
        entry.external_id.as_deref().unwrap_or("n/a"),
    );
    (subject, text)
}
