use resell_api::config::Config;
use resell_api::error::AppError;
use resell_api::logging::init_logging;
use resell_api::server::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    init_logging(&config.logging)?;

    tracing::info!(environment = %config.server.environment, "Starting resell tracker");

    let addr = config.address();

    // 创建并启动服务器
    let app = create_app(AppState::new(config)).await?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", &addr);
    tracing::info!("API available at http://{}/api", &addr);

    axum::serve(listener, app).await?;
    Ok(())
}
