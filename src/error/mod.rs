mod notify;
mod storage;
mod wishlist;

pub use notify::NotifyError;
pub use storage::StorageError;
pub use wishlist::{ApiErrorBody, WishlistError};
