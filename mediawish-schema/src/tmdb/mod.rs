mod external_ids;
mod search_multi;

pub use external_ids::TmdbExternalIds;
pub use search_multi::{TmdbMediaKind, TmdbSearchItem, TmdbSearchPage};
