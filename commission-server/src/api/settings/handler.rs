//! Personal Settings API Handlers

use axum::{Json, extract::State};
use shared::models::{LoadedSettings, PersonalCommissionSettings};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

/// GET /api/settings - 加载 (合并公司费率)
pub async fn load(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<LoadedSettings>>> {
    let loaded = state.settings_store.load_settings(&user).await?;
    Ok(ok(loaded))
}

/// PUT /api/settings - 整体保存
pub async fn save(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PersonalCommissionSettings>,
) -> AppResult<Json<ApiResponse<PersonalCommissionSettings>>> {
    let saved = state.settings_store.save_settings(&user, payload).await?;
    Ok(ok(saved))
}

/// DELETE /api/settings - 恢复默认
pub async fn reset(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<PersonalCommissionSettings>>> {
    let defaults = state.settings_store.reset_settings(&user).await?;
    Ok(ok_with_message("Settings reset to defaults", defaults))
}
