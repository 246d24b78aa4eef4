//! Calculator API Handlers

use axum::{Json, extract::State};
use shared::models::{
    BreakdownRequest, CalculationResult, CommissionBreakdown, CommissionCalcRequest,
    SimulateRequest,
};

use crate::auth::CurrentUser;
use crate::commission::calculation;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};

/// POST /api/calculator/commission
pub async fn commission(
    Json(req): Json<CommissionCalcRequest>,
) -> AppResult<Json<ApiResponse<CalculationResult>>> {
    let result =
        calculation::compute_commission(req.base_value, req.percentage, req.tax_percentage)?;
    Ok(ok(result))
}

/// POST /api/calculator/breakdown
///
/// Uses the caller's loaded settings unless the body carries its own.
pub async fn breakdown(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<BreakdownRequest>,
) -> AppResult<Json<ApiResponse<CommissionBreakdown>>> {
    let settings = match req.settings {
        Some(s) => s,
        None => state.settings_store.load_settings(&user).await?.settings,
    };
    let result = calculation::compute_detailed_breakdown(req.commission_value, &settings)?;
    Ok(ok(result))
}

/// POST /api/calculator/simulate
pub async fn simulate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<SimulateRequest>,
) -> AppResult<Json<ApiResponse<CalculationResult>>> {
    let settings = state.settings_store.load_settings(&user).await?.settings;
    let result = calculation::simulate(
        req.base_value,
        req.commission_type,
        req.percentage,
        req.tax_percentage,
        &settings,
    )?;
    Ok(ok(result))
}
