use std::sync::Arc;

use anyhow::Context;

use usersroles_api::config::AppConfig;
use usersroles_auth::{IdentityStore, SharedIdentityStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    usersroles_observability::init();

    let config = AppConfig::from_env().context("failed to read configuration")?;
    let store: SharedIdentityStore = Arc::new(
        IdentityStore::load(config.store.clone()).context("failed to load identity store")?,
    );

    spawn_reload_on_hangup(Arc::clone(&store));

    let app = usersroles_api::app::build_app(store, config.required_role.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        required_role = %config.required_role,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Reload the users and roles files whenever the process receives SIGHUP.
#[cfg(unix)]
fn spawn_reload_on_hangup(store: SharedIdentityStore) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(error = %err, "SIGHUP handler unavailable; reload disabled");
                return;
            }
        };
        while hangup.recv().await.is_some() {
            if let Err(err) = store.reload() {
                tracing::debug!(error = %err, "SIGHUP reload rejected; previous snapshot stays active");
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_hangup(_store: SharedIdentityStore) {}
