use serde::{Deserialize, Serialize};

/// `GET /{movie|tv}/{id}/external_ids`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl TmdbExternalIds {
    /// TMDB returns `""` as well as `null` for unknown ids.
    pub fn imdb_id(self) -> Option<String> {
        self.imdb_id.filter(|id| !id.trim().is_empty())
    }
}
