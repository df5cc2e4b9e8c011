pub mod api;
mod client;

pub use client::CatalogClient;

/// Max characters of an upstream error body copied into debug logs.
pub(crate) const UPSTREAM_BODY_PREVIEW_CHARS: usize = 512;
