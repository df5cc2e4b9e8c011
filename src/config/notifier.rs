use serde::{Deserialize, Serialize};
use url::Url;

/// Outbound notification transport. The account and credential themselves live in the
/// notification config store so an admin can rotate them at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    /// HTTP mail relay accepting `{from, to, subject, text}` JSON.
    /// TOML: `notify.relay_url`. Unset: notifications are skipped.
    #[serde(default)]
    pub relay_url: Option<Url>,

    /// TOML: `notify.subject_prefix`. Default: `[mediawish]`.
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,

    /// TOML: `notify.timeout_secs`. Default: `10`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            subject_prefix: default_subject_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_subject_prefix() -> String {
    "[mediawish]".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}
