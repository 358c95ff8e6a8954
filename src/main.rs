//! Labdesk booking service entry point
//!
//! Reads configuration from a TOML file (~/.config/labdesk/config.toml),
//! runs migrations and serves the HTTP API.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use labdesk::application::authorization::{Role, RoleProvider};
use labdesk::application::services::{
    AvailabilityService, BookingService, KioskService, QrService,
};
use labdesk::domain::{RepositoryProvider, User};
use labdesk::infrastructure::crypto::jwt::JwtConfig;
use labdesk::infrastructure::database::migrator::Migrator;
use labdesk::{
    create_router, default_config_path, init_database, AppConfig, DatabaseConfig,
    SeaOrmRepositoryProvider, SeaOrmRoleProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("LABDESK_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Labdesk booking service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {e}"))?;

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories & services ────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let roles: Arc<dyn RoleProvider> = Arc::new(SeaOrmRoleProvider::new(db));

    // Make sure at least one administrator exists
    ensure_admin_user(repos.as_ref()).await;

    let bookings = Arc::new(BookingService::new(repos.clone()));
    let qr = Arc::new(QrService::new(repos.clone()));
    let availability = Arc::new(AvailabilityService::new(repos.clone()));
    let kiosk = Arc::new(KioskService::with_default_label(
        repos.clone(),
        app_cfg.kiosk.default_label.clone(),
    ));

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: app_cfg.security.jwt_issuer.clone(),
    };

    // ── HTTP server ────────────────────────────────────────────
    let router = create_router(
        repos,
        roles,
        jwt_config,
        bookings,
        qr,
        availability,
        kiosk,
        prometheus_handle,
        app_cfg.kiosk.public_base_url.clone(),
    );

    let address = app_cfg.server.address();
    info!("Listening on http://{}", address);
    info!("Swagger UI available at http://{}/docs", address);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Create the default admin account on first start so the instance is not
/// locked out before the identity provider assigns roles.
async fn ensure_admin_user(repos: &dyn RepositoryProvider) {
    const ADMIN_EMAIL: &str = "admin@campus.local";

    let admin = match repos.users().find_by_email(ADMIN_EMAIL).await {
        Ok(Some(user)) => user,
        Ok(None) => match repos
            .users()
            .save(User::new("Lab Administrator", ADMIN_EMAIL))
            .await
        {
            Ok(user) => {
                info!("Created default admin user {}", ADMIN_EMAIL);
                user
            }
            Err(e) => {
                warn!("Failed to create default admin user: {}", e);
                return;
            }
        },
        Err(e) => {
            warn!("Failed to look up default admin user: {}", e);
            return;
        }
    };

    if let Err(e) = repos
        .users()
        .assign_role(admin.id, Role::Admin.as_str())
        .await
    {
        warn!("Failed to assign Admin role: {}", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
