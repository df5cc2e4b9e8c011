pub mod catalog;
pub mod config;
pub mod error;
pub mod notifier;
pub mod server;
pub mod store;
pub(crate) mod utils;

pub use error::WishlistError;
pub use store::{CatalogId, MediaType, NewEntry, WishlistEntry};
