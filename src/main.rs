//!
//! EV charging station booking service.
//! Reads configuration from TOML file (~/.config/evcharge-service/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use evcharge::application::services::{BookingConfig, BookingService, PaymentService};
use evcharge::auth::jwt::JwtConfig;
use evcharge::config::AppConfig;
use evcharge::infrastructure::database::migrator::Migrator;
use evcharge::{
    create_api_router, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("EVCHARGE_CONFIG")
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

    info!("Starting EV Charging Booking Service...");

    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "evcharge-service".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
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

    // Create default admin account if none exists
    create_default_admin(&db, &app_cfg).await;

    // Repositories and services
    let repos: Arc<dyn evcharge::domain::RepositoryProvider> =
        Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let booking = Arc::new(BookingService::new(
        db.clone(),
        BookingConfig::from(&app_cfg.booking),
    ));
    let payments = Arc::new(PaymentService::new(db.clone()));

    // REST API router
    let api_router = create_api_router(repos, booking, payments, jwt_config);

    let api_addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, api_router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("EV Charging Booking Service shutdown complete");
    Ok(())
}

/// Create default admin account if no admins exist
async fn create_default_admin(db: &sea_orm::DatabaseConnection, app_cfg: &AppConfig) {
    use evcharge::auth::password::hash_password;
    use evcharge::domain::admin::NewAdmin;
    use evcharge::domain::admin::AdminRepository;
    use evcharge::infrastructure::database::repositories::admin_repository::SeaOrmAdminRepository;

    let admins = SeaOrmAdminRepository::new(db.clone());
    let count = admins.count().await.unwrap_or(0);

    if count == 0 {
        info!("Creating default admin account...");

        let password_hash = match hash_password(&app_cfg.admin.password) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash admin password: {}", e);
                return;
            }
        };

        match admins
            .create(NewAdmin {
                username: app_cfg.admin.username.clone(),
                password_hash,
                name: app_cfg.admin.name.clone(),
                email: app_cfg.admin.email.clone(),
            })
            .await
        {
            Ok(admin) => {
                info!("Default admin created: {}", admin.email);
                warn!("Please change the admin password immediately!");
            }
            Err(e) => {
                error!("Failed to create admin account: {}", e);
            }
        }
    }
}
