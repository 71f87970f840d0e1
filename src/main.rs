//! TravelBook API - Travel Booking Service
//!
//! Tours, tour guides, hotels, restaurants and vehicles for travellers, with
//! an admin area for guide management, feedback moderation and approving
//! travel-agent registrations.

mod auth;
mod config;
mod db;
mod error;
mod forms;
mod mailer;
mod media;
mod models;
mod registration;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use crate::auth::{ensure_admin, SessionKeys};
use crate::config::Settings;
use crate::db::postgres::PgStore;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting TravelBook API...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    // Database is required
    let pool = db::create_pool(&settings.database)?;
    if let Err(e) = db::init_schema(&pool).await {
        error!("❌ FATAL: Database is not reachable or schema setup failed: {}", e);
        return Err(e);
    }
    info!(
        "✅ Database pool ready (TLS: {})",
        settings.database.require_tls
    );

    let store = Arc::new(PgStore::new(pool));
    if let Some(account) = &settings.admin {
        ensure_admin(store.as_ref(), account).await?;
    }

    let state = Arc::new(AppState::new(
        store,
        media::image_store(&settings.upload),
        mailer::smtp_mailer(&settings.smtp),
        SessionKeys::new(&settings.session),
    ));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 Endpoints:");
    info!("   ─── Tours ───");
    info!("   GET  /Tours/ListTour?searchString=   - List tours");
    info!("   GET  /Tours/TourDetails/{{id}}         - Tour details");
    info!("   POST /Tours/CreateTour               - Create tour (staff)");
    info!("   POST /Tours/EditTour/{{id}}            - Edit tour (staff)");
    info!("   POST /Tours/DeleteTour/{{id}}          - Delete tour (staff)");
    info!("");
    info!("   ─── Admin ───");
    info!("   GET  /Admin/TourGuideManagement      - Tour guides");
    info!("   GET  /Admin/FeedbackManagement       - Paged feedback");
    info!("   GET  /Admin/ListRegisterTravelAgent  - Pending travel agents");
    info!("   POST /Admin/RequestAccept?id=&email= - Accept registration");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,travelbook_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
