//! RabbitMQ HTTP auth backend entry point.
//!
//! # Purpose
//! Wires configuration, observability and the compiled policy into the HTTP
//! router, then serves until interrupted.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
use anyhow::Context;
use authbackend::app::{AppState, build_router};
use authbackend::{config, observability, policy};
use std::future::Future;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::AuthBackendConfig::from_env_or_yaml().context("auth backend config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: config::AuthBackendConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("warren-authbackend");
    let state = build_state(&config)?;

    let metrics_task = if config.metrics_enabled {
        Some(tokio::spawn(observability::serve_metrics(
            metrics_handle,
            config.metrics_bind,
        )))
    } else {
        None
    };

    let app = build_router(state);
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(%addr, "auth backend listening");
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {
            tracing::info!("shutdown requested");
        }
    }

    if let Some(task) = metrics_task {
        task.abort();
        let _ = task.await;
    }
    Ok(())
}

fn build_state(config: &config::AuthBackendConfig) -> anyhow::Result<AppState> {
    let policy = policy::load_policy(config.policy_path.as_deref())?;
    Ok(AppState::new(policy))
}
