use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::error::WishlistError;
use crate::notifier::{Notifier, RelayNotifier};
use crate::server::routes;
use crate::store::{NotifyConfigHandle, Stores, WishlistHandle};

use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use base64::Engine as _;
use rand::RngCore;
use std::time::Instant;
use std::{sync::Arc, time::Duration};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const MAX_BODY_BYTES: usize = 64 * 1024;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const USER_AGENT_VALUE: &str = concat!("mediawish/", env!("CARGO_PKG_VERSION"));

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

fn build_client(
    timeout_secs: u64,
    proxy: Option<&url::Url>,
) -> Result<reqwest::Client, WishlistError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT_VALUE)
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .timeout(Duration::from_secs(timeout_secs));

    if let Some(proxy_url) = proxy {
        let proxy = reqwest::Proxy::all(proxy_url.as_str())?;
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

#[derive(Clone)]
pub struct WishlistState {
    pub wishlist: WishlistHandle,
    pub notify_config: NotifyConfigHandle,
    pub catalog: CatalogClient,
    pub notifier: Arc<dyn Notifier>,
    /// `None` disables every admin-gated route (they answer 500).
    pub admin_password: Option<Arc<str>>,
}

impl WishlistState {
    pub fn new(stores: Stores, cfg: &Config) -> Result<Self, WishlistError> {
        let catalog_client = build_client(cfg.catalog.timeout_secs, cfg.catalog.proxy.as_ref())?;
        let notify_client = build_client(cfg.notify.timeout_secs, None)?;

        Ok(Self {
            wishlist: stores.wishlist,
            notify_config: stores.notify_config,
            catalog: CatalogClient::new(Arc::new(cfg.catalog.clone()), catalog_client),
            notifier: Arc::new(RelayNotifier::new(notify_client, &cfg.notify)),
            admin_password: cfg.basic.admin_password.as_deref().map(Arc::from),
        })
    }

    /// Replaces the outbound notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

async fn not_found_handler() -> Response {
    WishlistError::NotFound("Route not found.".to_string()).into_response()
}

async fn healthz() -> &'static str {
    "ok"
}

async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = start.elapsed().as_millis() as u64;
    let path = uri.path();
    let protocol = format_http_version(version);

    if status.is_server_error() {
        error!(
            status = status.as_u16(),
            %request_id,
            method = method.as_str(),
            protocol,
            path,
            latency_ms,
            %user_agent,
            "request failed"
        );
    } else if status.is_client_error() {
        warn!(
            status = status.as_u16(),
            %request_id,
            method = method.as_str(),
            protocol,
            path,
            latency_ms,
            %user_agent,
            "request rejected"
        );
    } else {
        info!(
            status = status.as_u16(),
            %request_id,
            method = method.as_str(),
            protocol,
            path,
            latency_ms,
            %user_agent,
            "request served"
        );
    }

    resp
}

pub fn wishlist_router(state: WishlistState) -> Router {
    Router::new()
        .merge(routes::router())
        .route("/healthz", get(healthz))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn(access_log))
}
