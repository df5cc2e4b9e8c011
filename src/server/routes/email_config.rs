use crate::config::deserialize_opt_string_lax;
use crate::error::WishlistError;
use crate::server::guards::admin::{AdminGated, AdminJson};
use crate::server::router::WishlistState;
use axum::{Json, extract::State};
use mediawish_schema::{EmailConfigView, MessageBody};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailConfigRequest {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(
        default,
        alias = "password",
        deserialize_with = "deserialize_opt_string_lax"
    )]
    pub admin_password: Option<String>,
}

impl AdminGated for EmailConfigRequest {
    fn admin_password(&self) -> Option<&str> {
        self.admin_password.as_deref()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// GET /api/email-config
pub async fn read_handler(
    State(state): State<WishlistState>,
) -> Result<Json<EmailConfigView>, WishlistError> {
    let config = state.notify_config.read().await?;
    Ok(Json(EmailConfigView {
        configured: config.is_configured(),
        account: config.account,
    }))
}

/// POST /api/email-config
///
/// Both fields set: enable. Both fields blank: disable. Anything else is rejected.
pub async fn write_handler(
    State(state): State<WishlistState>,
    AdminJson(body): AdminJson<EmailConfigRequest>,
) -> Result<Json<MessageBody>, WishlistError> {
    let message = match (is_blank(&body.account), is_blank(&body.credential)) {
        (false, false) => "Notification settings saved.",
        (true, true) => "Notification settings cleared.",
        _ => {
            return Err(WishlistError::bad_request(
                "account and credential must be provided together.",
            ));
        }
    };

    state
        .notify_config
        .write(body.account, body.credential)
        .await?;
    info!("{message}");
    Ok(Json(MessageBody::new(message)))
}
