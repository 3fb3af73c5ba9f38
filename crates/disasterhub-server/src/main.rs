mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use disasterhub_api::{AppState, AppStateInner};
use disasterhub_client::auth::LocalAuthenticator;
use disasterhub_client::directory::EmergencyDirectory;
use disasterhub_client::feed::ReportFeed;
use disasterhub_client::geolocation::FixedLocation;
use disasterhub_client::poller::Poller;
use disasterhub_client::report_form::ReportFormClient;
use disasterhub_client::routing::{RoutingClient, default_relief_centers};
use disasterhub_client::source::HttpReportSource;
use disasterhub_client::submit::EmergencyClient;
use disasterhub_db::{Database, LocalState};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "disasterhub=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Local storage
    let db = Database::open(&config.db_path)?;
    let local = Arc::new(LocalState::new(Arc::new(db)));

    let http = reqwest::Client::new();

    let feed = Arc::new(ReportFeed::new(
        Arc::new(HttpReportSource::new(http.clone(), config.reports_url.clone())),
        config.status_mapping,
        config.merge_policy,
    ));

    let state: AppState = Arc::new(AppStateInner {
        feed: feed.clone(),
        emergencies: EmergencyClient::new(http.clone(), &config.emergency_url, local.clone())
            .with_timeout(config.submit_timeout),
        directory: EmergencyDirectory::new(http.clone(), &config.emergency_url),
        report_form: ReportFormClient::new(http.clone(), &config.emergency_url),
        routing: RoutingClient::new(http, &config.routing_url),
        relief_centers: default_relief_centers(),
        geolocation: Arc::new(FixedLocation::new(config.latitude, config.longitude)),
        authenticator: Arc::new(LocalAuthenticator::new(local, config.admin.clone())),
        jwt_secret: config.jwt_secret.clone(),
    });

    let poller = Poller::spawn(feed, config.poll_interval);

    let app = disasterhub_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("DisasterHub server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
