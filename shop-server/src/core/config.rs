use crate::auth::{JwtConfig, JwtError};

/// Credentials of the admin account created at startup
#[derive(Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | DATABASE_PATH | ./data/shop.db | SQLite 数据库文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | LOG_DIR | - | 日志目录 (未设置则输出到 stdout) |
/// | ADMIN_USERNAME / ADMIN_PASSWORD | - | 启动时创建的管理员账号 |
/// | JWT_SECRET | 开发环境自动生成 | 至少 32 字符 |
/// | JWT_EXPIRATION_MINUTES | 10080 | 令牌有效期 |
/// | JWT_ISSUER / JWT_AUDIENCE | shop-server / shop-clients | |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/shop.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub admin: Option<AdminBootstrap>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// Fails only on an unusable JWT secret.
    pub fn from_env() -> Result<Self, JwtError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(environment == "development")?;

        let admin = match (env_non_empty("ADMIN_USERNAME"), env_non_empty("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminBootstrap { username, password }),
            _ => None,
        };

        Ok(Self {
            http_port: env_parse("HTTP_PORT", 5000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/shop.db".into()),
            environment,
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30_000),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10_000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            log_dir: env_non_empty("LOG_DIR"),
            admin,
            jwt,
        })
    }

    /// Defaults with the given database file and a generated JWT key.
    ///
    /// Does not read the environment; used by tests and embedders.
    pub fn with_database(database_path: impl Into<String>) -> Self {
        Self {
            http_port: 0,
            database_path: database_path.into(),
            environment: "development".into(),
            request_timeout_ms: 30_000,
            shutdown_timeout_ms: 10_000,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            admin: None,
            jwt: JwtConfig::generated(),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
