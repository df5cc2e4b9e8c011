use serde::{Deserialize, Serialize};

/// One page of `GET /search/multi`.
///
/// Only the fields the catalog client consumes are modeled; TMDB adds fields freely.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbSearchPage {
    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub results: Vec<TmdbSearchItem>,

    #[serde(default)]
    pub total_results: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TmdbMediaKind {
    Movie,
    Tv,
    /// `person` and anything TMDB introduces later.
    #[serde(other)]
    Other,
}

impl TmdbMediaKind {
    pub fn as_path_segment(self) -> Option<&'static str> {
        match self {
            TmdbMediaKind::Movie => Some("movie"),
            TmdbMediaKind::Tv => Some("tv"),
            TmdbMediaKind::Other => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbSearchItem {
    pub id: u64,

    pub media_type: TmdbMediaKind,

    /// Movies carry `title`, series carry `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

impl TmdbSearchItem {
    /// Display title for either media kind.
    pub fn display_title(&self) -> Option<&str> {
        let primary = match self.media_type {
            TmdbMediaKind::Movie => self.title.as_deref(),
            _ => self.name.as_deref(),
        };
        primary
            .or(self.title.as_deref())
            .or(self.name.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn release_date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.first_air_date.as_deref().filter(|s| !s.is_empty()))
    }
}
