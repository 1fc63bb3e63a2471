use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use contacts::auth::credentials::CredentialStore;
use contacts::auth::password;
use contacts::cli::{Cli, Command};
use contacts::config::Config;
use contacts::store::{AppState, SessionStore};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::HashPassword { password: plain } = cli.action() {
        println!("{}", password::hash_password(plain)?);
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("CONTACTS_LOG").unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().json())
        .init();

    let cfg = Config::load();

    // Unreadable or malformed credentials are fatal
    let credentials = CredentialStore::load(&cfg.credentials_path)?;
    if credentials.is_empty() {
        tracing::warn!(path = %cfg.credentials_path.display(), "no users configured, sign-in will always fail");
    }

    let addr: SocketAddr = cfg.listen.parse()?;
    let state = AppState::new(cfg, credentials)?;

    tokio::spawn(sweep_sessions(state.sessions.clone()));

    let app = contacts::api::app(state);

    tracing::info!(%addr, "starting contacts");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("contacts stopped");
    Ok(())
}

async fn sweep_sessions(sessions: SessionStore) {
    let mut tick = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        tick.tick().await;
        let purged = sessions.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, remaining = sessions.len(), "expired sessions swept");
        }
    }
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
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
