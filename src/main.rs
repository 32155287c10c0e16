use product_api::config::{load_config, ConfigSource};
use product_api::infrastructure::{database::DatabaseManager, logger::Logger};
use product_api::{create_app, AppState};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, source) = load_config()?;

    // 初始化日志
    Logger::init(&config.logging);

    match &source {
        ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
        ConfigSource::Defaults => info!("No config file found, using defaults"),
    }

    // 连接数据库并同步表结构
    let db = DatabaseManager::connect(&config.database)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;
    db.sync_schema().await.map_err(|e| {
        error!("Failed to synchronize database schema: {}", e);
        e
    })?;

    let state = AppState::new(db.get_pool().clone());
    let app = create_app(state, &config.http)?;

    let listener =
        TcpListener::bind((config.http.bind_address.as_str(), config.http.port)).await?;
    let addr = listener.local_addr()?;

    info!("🚀 Product API running on http://{}", addr);
    info!("📖 Endpoints:");
    info!("   GET    /api/products      - List products");
    info!("   GET    /api/products/:id  - Get product by ID");
    info!("   POST   /api/products      - Create product");
    info!("   PUT    /api/products/:id  - Replace product");
    info!("   PATCH  /api/products/:id  - Toggle availability");
    info!("   DELETE /api/products/:id  - Delete product");
    info!("   GET    /docs              - API documentation");
    info!("🌐 Allowed origin: {}", config.http.frontend_url);

    axum::serve(listener, app).await?;

    Ok(())
}
