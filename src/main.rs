use bill_portal::{api, AppConfig, BillStore, MemoryBillStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load();
    info!("Starting server with config: {:?}", config);

    // 创建票据存储
    let store: Arc<dyn BillStore> = match &config.store.fixtures_path {
        Some(path) => Arc::new(MemoryBillStore::from_fixtures(&config.store.receipt_base_url, path).await?),
        None => Arc::new(MemoryBillStore::new(&config.store.receipt_base_url)),
    };
    info!("Bill store ready");

    let app = api::router(api::AppState::new(store));

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/bills          - bill list");
    info!("  POST /api/bills/new      - open new bill form");
    info!("  POST /api/bills/receipt  - choose receipt file");
    info!("  POST /api/bills          - submit new bill");
    info!("  GET  /api/bills/preview  - receipt preview");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
