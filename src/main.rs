use mediawish::config::CONFIG;
use mediawish::server::router::{WishlistState, wishlist_router};
use mediawish::store::Stores;
use mimalloc::MiMalloc;
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const BUILD_TAG: &str = match option_env!("MEDIAWISH_BUILD_TAG") {
    Some(tag) => tag,
    None => "dev",
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        build = BUILD_TAG,
        data_dir = %cfg.basic.data_dir.display(),
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        catalog_base_url = %cfg.catalog.base_url,
        catalog_proxy = %cfg.catalog.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        notify_relay = %cfg.notify.relay_url.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        "Starting mediawish"
    );

    if cfg.basic.admin_password.is_none() {
        warn!("ADMIN_PASSWORD is not set; admin routes will answer 500.");
    }

    let stores = Stores::spawn(cfg).await?;
    let state = WishlistState::new(stores, cfg)?;
    if !state.catalog.is_configured() {
        warn!("TMDB_API_KEY is not set; /api/search will answer 500.");
    }
    let app = wishlist_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
