//! Shop Server - 商品目录、购物车、下单与销售报表
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移与仓储
//! - **认证** (`auth`): JWT + Argon2，先认证后按角色授权
//! - **购物车** (`cart`): 每用户一个购物车，同商品合并
//! - **订单** (`orders`): 校验后在单个事务中扣库存、写订单、清空购物车
//! - **HTTP API** (`api`): RESTful 接口，统一响应信封
//!
//! # 模块结构
//!
//! ```text
//! shop-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、密码、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── cart/          # 购物车服务
//! ├── orders/        # 下单引擎、金额计算
//! ├── db/            # 连接池与仓储
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_  ____  ____
  \__ \/ __ \/ __ \/ __ \
 ___/ / / / / /_/ / /_/ /
/____/_/ /_/\____/ .___/
                /_/
    "#
    );
}
