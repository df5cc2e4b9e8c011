use super::{Notifier, compose_added_message};
use crate::config::NotifierConfig;
use crate::error::NotifyError;
use crate::store::{NotificationConfig, WishlistEntry};
use crate::utils::logging::debug_pretty_json;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;
use url::Url;

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Sends mail through an HTTP relay. The stored account is both sender and recipient.
#[derive(Clone)]
pub struct RelayNotifier {
    client: reqwest::Client,
    relay_url: Option<Url>,
    subject_prefix: String,
}

impl RelayNotifier {
    pub fn new(client: reqwest::Client, cfg: &NotifierConfig) -> Self {
        Self {
            client,
            relay_url: cfg.relay_url.clone(),
            subject_prefix: cfg.subject_prefix.clone(),
        }
    }
}

#[async_trait]
impl Notifier for RelayNotifier {
    async fn notify_added(
        &self,
        config: &NotificationConfig,
        entry: &WishlistEntry,
    ) -> Result<(), NotifyError> {
        let Some(relay_url) = self.relay_url.as_ref() else {
            debug!(
                catalog_id = %entry.catalog_id,
                "No mail relay configured, skipping notification"
            );
            return Ok(());
        };
        let (Some(account), Some(credential)) =
            (config.account.as_deref(), config.credential.as_deref())
        else {
            return Err(NotifyError::NotConfigured);
        };

        let (subject, text) = compose_added_message(&self.subject_prefix, entry);
        let message = RelayMessage {
            from: account,
            to: account,
            subject: &subject,
            text: &text,
        };
        debug_pretty_json("[Notifier] relay message", &message);

        let resp = self
            .client
            .post(relay_url.clone())
            .bearer_auth(credential)
            .json(&message)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::RelayStatus { status, body });
        }
        Ok(())
    }
}
