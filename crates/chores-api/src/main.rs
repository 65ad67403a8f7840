//! # chores: Binary Entry Point
//!
//! Loads the zone configuration and rotation index, starts the week
//! scheduler and serves the HTTP API until SIGINT/SIGTERM or a fatal
//! runtime error. On a clean shutdown the rotation index is written once
//! more before exiting.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;

use chores_api::clock::SystemClock;
use chores_api::scheduler::Scheduler;
use chores_api::state::{
    AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_INDEX_PATH, DEFAULT_LISTEN, DEFAULT_WEB_ROOT,
};

/// Weekly round-robin chore rotation server.
#[derive(Parser, Debug)]
#[command(name = "chores", version, about)]
struct Cli {
    /// Zone configuration file (.json, .yaml or .yml).
    #[arg(long, env = "CHORES_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory containing index.html and static/.
    #[arg(long, env = "CHORES_WEBROOT", default_value = DEFAULT_WEB_ROOT)]
    root: PathBuf,

    /// Persisted rotation index file.
    #[arg(long, env = "CHORES_INDEX_PATH", default_value = DEFAULT_INDEX_PATH)]
    index_path: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "CHORES_LISTEN", default_value = DEFAULT_LISTEN)]
    listen: SocketAddr,

    /// Emit logs as JSON lines.
    #[arg(long, env = "CHORES_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("chores exited with an error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig {
        config_path: cli.config,
        web_root: cli.root,
        index_path: cli.index_path,
        listen: cli.listen,
    };
    let listen = config.listen;

    let state = chores_api::bootstrap::bootstrap(config, Arc::new(SystemClock))
        .context("bootstrap failed")?;

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind {listen}"))?;
    tracing::info!(addr = %listen, "chores listening");

    let (stop_scheduler, scheduler_stopped) = tokio::sync::oneshot::channel::<()>();
    let scheduler = Scheduler::new(state.rotation.clone(), Arc::clone(&state.clock));
    let scheduler_task = {
        let fatal = state.fatal.clone();
        tokio::spawn(async move {
            let stop = async move {
                let _ = scheduler_stopped.await;
            };
            if let Err(e) = scheduler.run(stop).await {
                tracing::error!(error = %e, "scheduler failed");
                fatal.raise(e.to_string());
            }
        })
    };

    let fatal = state.fatal.clone();
    let shutdown = async move {
        tokio::select! {
            () = shutdown_signal() => {}
            () = fatal.raised() => {
                tracing::error!("fatal runtime error, initiating shutdown");
            }
        }
    };

    axum::serve(listener, chores_api::app(state.clone()))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    let _ = stop_scheduler.send(());
    scheduler_task.await.context("scheduler task panicked")?;

    if let Some(reason) = state.fatal.reason() {
        anyhow::bail!("fatal runtime error: {reason}");
    }

    let index = state
        .rotation
        .persist()
        .context("failed to persist rotation index on shutdown")?;
    tracing::info!(index = %index, "rotation index persisted, exiting");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
