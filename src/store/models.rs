use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::{collections::BTreeMap, fmt};

/// Catalog identifier in string-normalized form.
///
/// Clients send ids as JSON numbers or strings (`42` and `"42"`); both map to the same key.
/// Canonical unsigned integers serialize back as numbers, everything else as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogId(String);

impl CatalogId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_canonical_u64(&self) -> Option<u64> {
        self.0
            .parse::<u64>()
            .ok()
            .filter(|n| n.to_string() == self.0)
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for CatalogId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for CatalogId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Serialize for CatalogId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_canonical_u64() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for CatalogId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(CatalogId::new(s)),
            Value::Number(n) => Ok(n
                .as_u64()
                .map_or_else(|| CatalogId::new(n.to_string()), CatalogId::from)),
            _ => Err(serde::de::Error::custom(
                "expected a string or a number for a catalog id",
            )),
        }
    }
}

/// Wire tokens follow the catalog (`movie`, `tv`); `series` is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv", alias = "series")]
    Series,
}

impl MediaType {
    pub fn label(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
        }
    }
}

/// Workflow position of an entry, derived from its lifecycle stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Pending,
    OnHold,
    Added,
}

impl std::str::FromStr for LifecycleStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(LifecycleStage::Pending),
            "on_hold" => Ok(LifecycleStage::OnHold),
            "added" => Ok(LifecycleStage::Added),
            other => Err(format!(
                "Unknown stage \"{other}\"; expected pending, on_hold, or added."
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    #[serde(alias = "tmdbId")]
    pub catalog_id: CatalogId,

    pub title: String,

    pub media_type: MediaType,

    #[serde(default, alias = "imdbId")]
    pub external_id: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_hold_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,

    /// Fields this version does not know about, kept verbatim across rewrites.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl WishlistEntry {
    pub fn stage(&self) -> LifecycleStage {
        if self.added_at.is_some() {
            LifecycleStage::Added
        } else if self.on_hold_at.is_some() {
            LifecycleStage::OnHold
        } else {
            LifecycleStage::Pending
        }
    }

    /// Whether `candidate` would collide with this entry.
    pub(crate) fn collides_with(&self, candidate: &NewEntry) -> bool {
        if self.catalog_id == candidate.catalog_id {
            return true;
        }
        match (&candidate.external_id, &self.external_id) {
            (Some(theirs), Some(ours)) => theirs == ours,
            _ => false,
        }
    }

    pub(crate) fn apply_stage(&mut self, stage: LifecycleStage, now: DateTime<Utc>) {
        match stage {
            LifecycleStage::Pending => {
                self.on_hold_at = None;
                self.added_at = None;
            }
            LifecycleStage::OnHold => self.on_hold_at = Some(now),
            LifecycleStage::Added => self.added_at = Some(now),
        }
    }
}

/// An entry as submitted for insertion; `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub catalog_id: CatalogId,
    pub title: String,
    pub media_type: MediaType,
    pub external_id: Option<String>,
}

impl NewEntry {
    pub fn new(
        catalog_id: impl Into<CatalogId>,
        title: impl Into<String>,
        media_type: MediaType,
        external_id: Option<String>,
    ) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            title: title.into(),
            media_type,
            external_id,
        }
    }

    /// Trims text fields, drops a blank external id, and rejects blank required fields.
    pub(crate) fn normalized(self) -> Result<Self, &'static str> {
        let title = self.title.trim().to_string();
        if self.catalog_id.is_empty() || title.is_empty() {
            return Err("catalogId, title, and mediaType are required.");
        }
        let external_id = self
            .external_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        Ok(Self {
            catalog_id: self.catalog_id,
            title,
            media_type: self.media_type,
            external_id,
        })
    }

    pub(crate) fn into_entry(self, created_at: DateTime<Utc>) -> WishlistEntry {
        WishlistEntry {
            catalog_id: self.catalog_id,
            title: self.title,
            media_type: self.media_type,
            external_id: self.external_id,
            created_at,
            on_hold_at: None,
            added_at: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Single-record credentials for outbound notifications.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub account: Option<String>,

    #[serde(default)]
    pub credential: Option<String>,
}

impl NotificationConfig {
    /// Trims the account. The credential is stored verbatim; blank values become `None`.
    pub fn new(account: Option<String>, credential: Option<String>) -> Self {
        Self {
            account: account
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            credential: credential.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.account) && present(&self.credential)
    }
}

impl fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("account", &self.account)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
