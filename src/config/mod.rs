mod basic;
mod catalog;
mod notifier;

pub use basic::BasicConfig;
pub use catalog::CatalogConfig;
pub use notifier::NotifierConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// TMDB catalog settings (see `catalog` table in config.toml).
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Outbound notification settings (see `notify` table in config.toml).
    #[serde(default)]
    pub notify: NotifierConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "MEDIAWISH_";

/// Bare environment names honoured for compatibility with existing `.env` files.
const LEGACY_ENV_KEYS: [(&str, &str); 3] = [
    ("PORT", "basic.listen_port"),
    ("ADMIN_PASSWORD", "basic.admin_password"),
    ("TMDB_API_KEY", "catalog.api_key"),
];

impl Config {
    /// Builds a Figment that merges, in increasing priority: defaults, `config.toml`,
    /// `MEDIAWISH_*` variables (`__` separates tables), then the legacy bare names.
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(legacy_env())
    }

    /// Loads configuration from every source. Panics on malformed values.
    pub fn load() -> Self {
        Self::figment()
            .extract()
            .unwrap_or_else(|err| panic!("failed to extract configuration: {err}"))
    }

    pub fn wishlist_path(&self) -> PathBuf {
        self.basic.data_dir.join("wishlist.json")
    }

    pub fn notify_config_path(&self) -> PathBuf {
        self.basic.data_dir.join("email-config.json")
    }
}

fn legacy_env() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map_or_else(|| key.as_str().to_owned().into(), |(_, path)| (*path).into())
    })
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::load);

/// Secrets frequently arrive as bare numbers, both from env files (`ADMIN_PASSWORD=123456`)
/// and from JSON request bodies (`{"password": 123456}`). Blank strings count as unset.
pub(crate) fn deserialize_opt_string_lax<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;

    let s = match v {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(_) => {
            return Err(serde::de::Error::custom(
                "expected a string or a number for a secret value",
            ));
        }
    };

    Ok(Some(s).filter(|s| !s.trim().is_empty()))
}
