//! Commission Server - 房地产佣金引擎
//!
//! # 架构概述
//!
//! - **佣金配置** (`commission::config_store`): 每个公司最多一个生效配置
//! - **个人设置** (`commission::settings_store`): 经纪人设置，公司费率合并覆盖
//! - **计算引擎** (`commission::calculation`): Decimal 精度的纯函数
//! - **状态机** (`commission::lifecycle`): PENDING → APPROVED/REJECTED → PAID
//! - **统计** (`commission::statistics`): 按状态/类型/本月聚合
//! - **HTTP API** (`api`): axum 路由
//!
//! # 模块结构
//!
//! ```text
//! commission-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── commission/    # 佣金引擎
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误、日志、校验、时区
//! └── db/            # SQLite 连接池与 repository
//! ```

pub mod api;
pub mod auth;
pub mod commission;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro
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

/// 设置运行环境
///
/// 1. 加载 `.env`
/// 2. 创建工作目录与日志目录
/// 3. 初始化日志 (生产环境 JSON + 文件)
pub fn setup_environment() -> Result<Config, core::ServerError> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    init_logger_with_file(
        Some(&config.log_level),
        Some(config.is_production()),
        Some(&log_dir),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   ______                          _           _
  / ____/___  ____ ___  ____ ___  (_)_________(_)___  ____
 / /   / __ \/ __ `__ \/ __ `__ \/ / ___/ ___/ / __ \/ __ \
/ /___/ /_/ / / / / / / / / / / / (__  |__  ) / /_/ / / / /
\____/\____/_/ /_/ /_/_/ /_/ /_/_/____/____/_/\____/_/ /_/
    "#
    );
}
