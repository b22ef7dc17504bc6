use shop_server::{Config, Server, ServerState, cleanup_old_logs, init_logger_with_file, print_banner};

/// Rolling log files older than this are removed at startup
const LOG_RETENTION_DAYS: u64 = 14;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境变量 (.env 可选)
    dotenv::dotenv().ok();

    // 2. 加载配置
    let config = Config::from_env()?;

    // 3. 日志
    init_logger_with_file(Some(config.log_level.as_str()), config.log_json, config.log_dir.as_deref());
    if let Some(dir) = &config.log_dir {
        match cleanup_old_logs(dir, LOG_RETENTION_DAYS) {
            Ok(0) => {}
            Ok(n) => tracing::info!("Removed {} old log files", n),
            Err(e) => tracing::warn!("Log cleanup failed: {}", e),
        }
    }

    print_banner();
    tracing::info!(environment = %config.environment, "🛒 Shop Server starting...");

    // 4. 初始化服务器状态 (数据库、迁移、管理员)
    let state = ServerState::initialize(&config).await?;

    // 5. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
