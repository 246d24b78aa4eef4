//! 健康检查路由
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/health | GET | 无 |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{ApiResponse, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 状态 (ok | degraded)
    status: &'static str,
    version: &'static str,
    environment: String,
    /// 数据库是否可用
    database: bool,
}

async fn health(State(state): State<ServerState>) -> Json<ApiResponse<HealthResponse>> {
    let database = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    if !database {
        tracing::warn!("Health check: database unreachable");
    }
    ok(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database,
    })
}
