use anyhow::Result;
use blog_api::{
    AppState, UploadConfig,
    config::{ServerConfig, StorageBackend},
    create_router,
};
use blog_auth::{credentials::HashingConfig, jwt::JwtConfig};
use blog_common::database::{self, DatabaseConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting blog API service");

    let server_config = ServerConfig::from_env()?;
    let jwt_config = JwtConfig::from_env()?;
    let hashing = HashingConfig::from_env();
    let uploads = UploadConfig::new(server_config.upload_dir.clone());

    let app_state = match server_config.storage {
        StorageBackend::Postgres => {
            // Initialize database connection pool
            let db_config = DatabaseConfig::from_env()?;
            let pool = database::init_pool(&db_config).await?;

            // Check database connectivity
            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            database::run_migrations(&pool).await?;
            AppState::postgres(pool, jwt_config, hashing, uploads)?
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; all data is lost on shutdown");
            AppState::in_memory(jwt_config, hashing, uploads)?
        }
    };

    // Start the web server
    let app = create_router(app_state);

    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Blog API listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
