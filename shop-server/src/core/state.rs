use std::sync::Arc;

use shared::models::Role;
use sqlx::SqlitePool;

use crate::auth::{JwtService, hash_password};
use crate::core::config::AdminBootstrap;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::{RepoError, user as user_repo};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求 clone 一次。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库连接池
    pub db: DbService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    pub fn new(config: Config, db: DbService, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 打开数据库并执行迁移
    /// 2. 创建 JWT 服务
    /// 3. 如配置了管理员账号且不存在，则创建
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        if let Some(admin) = &config.admin {
            bootstrap_admin(&db.pool, admin).await?;
        }

        Ok(Self::new(config.clone(), db, jwt_service))
    }

    /// 获取连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}

/// Create the configured admin account unless the username is taken
async fn bootstrap_admin(pool: &SqlitePool, admin: &AdminBootstrap) -> Result<()> {
    let existing = user_repo::find_by_username(pool, &admin.username)
        .await
        .map_err(|e| ServerError::Database(e.to_string()))?;
    if let Some(user) = existing {
        if Role::parse(&user.role) != Role::Admin {
            tracing::warn!(username = %admin.username, "Bootstrap admin name belongs to a non-admin user");
        }
        return Ok(());
    }

    let hash = hash_password(&admin.password)
        .map_err(|e| ServerError::Config(format!("Failed to hash admin password: {e}")))?;

    match user_repo::create(pool, &admin.username, &hash, Role::Admin).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "Admin account created");
            Ok(())
        }
        // created concurrently by another instance
        Err(RepoError::Duplicate(_)) => Ok(()),
        Err(e) => Err(ServerError::Database(e.to_string())),
    }
}
