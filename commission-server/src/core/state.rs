//! Server State
//!
//! 持有所有服务的共享引用，Arc 浅拷贝

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{Authorizer, JwtService, RoleAuthorizer};
use crate::commission::{
    CommissionLifecycle, ConfigStore, PersonalSettingsStore, StatisticsAggregator,
};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    SqliteCommissionConfigRepository, SqliteCommissionRepository,
    SqlitePersonalSettingsRepository,
};
use crate::utils::{AppError, AppResult};

/// 服务器状态
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | jwt_service | JWT 认证服务 |
/// | config_store | 公司佣金配置 |
/// | settings_store | 经纪人个人设置 |
/// | commissions | 佣金状态机 |
/// | statistics | 佣金统计 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub config_store: Arc<ConfigStore>,
    pub settings_store: Arc<PersonalSettingsStore>,
    pub commissions: Arc<CommissionLifecycle>,
    pub statistics: Arc<StatisticsAggregator>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 工作目录
    /// 2. 数据库 (迁移)
    /// 3. 各服务
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!("Failed to create work dir {}: {e}", config.work_dir))
        })?;

        let db = DbService::new(&config.database_path).await?;
        Ok(Self::from_pool(config.clone(), db.pool))
    }

    /// Wire every service over an existing pool
    pub fn from_pool(config: Config, pool: SqlitePool) -> Self {
        Self::with_authorizer(config, pool, Arc::new(RoleAuthorizer))
    }

    /// Wire every service with a custom permission check
    pub fn with_authorizer(
        config: Config,
        pool: SqlitePool,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let config_store = Arc::new(ConfigStore::new(
            Arc::new(SqliteCommissionConfigRepository::new(pool.clone())),
            authorizer.clone(),
        ));
        let settings_store = Arc::new(PersonalSettingsStore::new(
            config_store.clone(),
            Arc::new(SqlitePersonalSettingsRepository::new(pool.clone())),
        ));
        let commissions = Arc::new(CommissionLifecycle::new(
            Arc::new(SqliteCommissionRepository::new(pool.clone())),
            config_store.clone(),
            authorizer,
        ));
        let statistics = Arc::new(StatisticsAggregator::new(
            commissions.clone(),
            settings_store.clone(),
            config.timezone,
        ));

        Self {
            config,
            pool,
            jwt_service,
            config_store,
            settings_store,
            commissions,
            statistics,
        }
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
