mod messages;
mod search;

pub use messages::{EmailConfigView, MessageBody, RemovedBody};
pub use search::{SearchResponse, SearchResult};
