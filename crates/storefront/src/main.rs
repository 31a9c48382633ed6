//! Amazona Storefront - trusted pricing service.
//!
//! Serves `POST /api/pricing` (default port 3000). Cart stores send their
//! candidate item lists here and commit the returned totals and delivery
//! estimate as-is.
//!
//! # Architecture
//!
//! - Axum, JSON in and out
//! - Pricing policy (tax rate, delivery options, free-shipping threshold)
//!   read from the environment once at startup
//! - Stateless: no database, no sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use amazona_storefront::config::StorefrontConfig;
use amazona_storefront::routes;
use amazona_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not up yet.
            #[allow(clippy::print_stderr)]
            {
                eprintln!("amazona-storefront: {e}");
            }
            return ExitCode::FAILURE;
        }
    };

    // Sentry first so the tracing layer has a client to report to.
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = serve(config).await {
        tracing::error!(error = %e, "Pricing service stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Start Sentry when a DSN is configured. The guard flushes on drop.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Into::into),
        attach_stacktrace: true,
        ..Default::default()
    };
    Some(sentry::init((dsn, options)))
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "amazona_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Warnings and errors become Sentry events; info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

async fn serve(config: StorefrontConfig) -> std::io::Result<()> {
    let addr = config.socket_addr();
    tracing::info!(
        tax_rate = %config.pricing.tax_rate,
        free_shipping_min = %config.pricing.free_shipping_min,
        "Pricing policy loaded"
    );

    let app = routes::router(AppState::new(config))
        // Outermost, so every request gets a hub and a transaction
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Pricing service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down, draining in-flight requests");
}
