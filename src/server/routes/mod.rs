use crate::server::router::WishlistState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub mod email_config;
pub mod search;
pub mod wishlist;

pub fn router() -> Router<WishlistState> {
    Router::new()
        .route("/api/search", get(search::search_handler))
        .route(
            "/api/wishlist",
            get(wishlist::list_handler)
                .post(wishlist::add_handler)
                .delete(wishlist::remove_many_handler),
        )
        .route("/api/wishlist/clear", post(wishlist::clear_handler))
        .route("/api/wishlist/{id}", delete(wishlist::remove_one_handler))
        .route("/api/wishlist/{id}/stage", post(wishlist::stage_handler))
        .route(
            "/api/email-config",
            get(email_config::read_handler).post(email_config::write_handler),
        )
}
