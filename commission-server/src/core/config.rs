use chrono_tz::Tz;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | DATABASE_PATH | $WORK_DIR/commission.db | SQLite 数据库文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TIMEZONE | America/Sao_Paulo | 业务时区 ("本月" 统计边界) |
/// | LOG_LEVEL | info | 日志级别 |
/// | MAX_CONNECTIONS | 1000 | 最大并发请求数 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/commission HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 业务时区
    pub timezone: Tz,
    /// 日志级别
    pub log_level: String,
    /// 最大并发请求数
    pub max_connections: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| format!("{}/commission.db", work_dir.trim_end_matches('/')));

        Self {
            database_path,
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| {
                    tz.parse::<Tz>()
                        .inspect_err(|e| tracing::warn!("Invalid TIMEZONE '{}': {}", tz, e))
                        .ok()
                })
                .unwrap_or(chrono_tz::America::Sao_Paulo),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            max_connections: std::env::var("MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = format!("{}/commission.db", config.work_dir.trim_end_matches('/'));
        config.http_port = http_port;
        config
    }

    /// 日志目录
    pub fn log_dir(&self) -> String {
        format!("{}/logs", self.work_dir.trim_end_matches('/'))
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

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_derive_database_path_from_work_dir() {
        let config = Config::with_overrides("/tmp/commission/", 8081);
        assert_eq!(config.work_dir, "/tmp/commission/");
        assert_eq!(config.database_path, "/tmp/commission/commission.db");
        assert_eq!(config.log_dir(), "/tmp/commission/logs");
        assert_eq!(config.http_port, 8081);
    }
}
