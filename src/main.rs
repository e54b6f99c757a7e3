use cleaning_checklist::{resolve_data_path, restore_saved, router, AppState, Catalog, ChecklistStore};
use chrono::Local;
use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = resolve_data_path();
    if let Some(parent) = data_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(err) = fs::create_dir_all(parent).await {
            warn!(path = %parent.display(), "data directory unavailable, saves will fail: {err}");
        }
    }

    let today = Local::now().date_naive();
    let mut store = ChecklistStore::new(Catalog::builtin(), today);
    let notice = restore_saved(&mut store, &data_path, today).await;
    info!(path = %data_path.display(), "startup load: {}", notice.message);

    let app = router(AppState::new(data_path, store));

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
    info!("shutting down");
}
