pub mod api;
pub mod tmdb;

pub use api::{EmailConfigView, MessageBody, RemovedBody, SearchResponse, SearchResult};
pub use tmdb::{TmdbExternalIds, TmdbMediaKind, TmdbSearchItem, TmdbSearchPage};
