//! Commission Config API Handlers

use axum::{Json, extract::State};
use shared::models::{CommissionConfig, CommissionConfigCreate, CommissionConfigUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};

/// GET /api/commission-config - 当前生效配置
pub async fn get(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<CommissionConfig>>> {
    let config = state.config_store.get_config(user.company_id).await?;
    Ok(ok(config))
}

/// POST /api/commission-config - 创建配置 (已有生效配置则冲突)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CommissionConfigCreate>,
) -> AppResult<Json<ApiResponse<CommissionConfig>>> {
    let config = state.config_store.create_config(&user, payload).await?;
    Ok(ok(config))
}

/// PUT /api/commission-config - 整体替换四个百分比
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CommissionConfigUpdate>,
) -> AppResult<Json<ApiResponse<CommissionConfig>>> {
    let config = state.config_store.update_config(&user, payload).await?;
    Ok(ok(config))
}

/// DELETE /api/commission-config - 停用
pub async fn deactivate(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<CommissionConfig>>> {
    let config = state.config_store.deactivate_config(&user).await?;
    Ok(ok(config))
}
