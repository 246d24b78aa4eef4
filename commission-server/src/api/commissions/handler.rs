//! Commission API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono_tz::Tz;
use serde::Deserialize;
use shared::models::{
    Commission, CommissionCreate, CommissionFilter, CommissionPay, CommissionReject,
    CommissionStatistics, CommissionStatus, CommissionType, CommissionUpdate,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};

/// 列表/统计查询参数
///
/// 日期为业务时区的 `YYYY-MM-DD`，`end_date` 当天包含在内。
#[derive(Debug, Default, Deserialize)]
pub struct CommissionQuery {
    pub status: Option<CommissionStatus>,
    #[serde(rename = "type")]
    pub commission_type: Option<CommissionType>,
    pub user_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub search: Option<String>,
}

impl CommissionQuery {
    fn into_filter(self, tz: Tz) -> AppResult<CommissionFilter> {
        let created_from = self
            .start_date
            .as_deref()
            .map(|d| parse_date(d).map(|d| day_start_millis(d, tz)))
            .transpose()?;
        let created_to = self
            .end_date
            .as_deref()
            .map(|d| parse_date(d).map(|d| day_end_millis(d, tz)))
            .transpose()?;

        if let (Some(from), Some(to)) = (created_from, created_to)
            && from >= to
        {
            return Err(AppError::validation("start_date must not be after end_date")
                .with_detail("field", "start_date"));
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value)
            && min > max
        {
            return Err(AppError::validation("min_value must not exceed max_value")
                .with_detail("field", "min_value"));
        }

        Ok(CommissionFilter {
            status: self.status,
            commission_type: self.commission_type,
            user_id: self.user_id,
            created_from,
            created_to,
            min_value: self.min_value,
            max_value: self.max_value,
            search: self.search,
        })
    }
}

/// GET /api/commissions
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<CommissionQuery>,
) -> AppResult<Json<ApiResponse<Vec<Commission>>>> {
    let filter = query.into_filter(state.config.timezone)?;
    let commissions = state.commissions.list_commissions(&user, &filter).await?;
    Ok(ok(commissions))
}

/// GET /api/commissions/statistics
pub async fn statistics(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<CommissionQuery>,
) -> AppResult<Json<ApiResponse<CommissionStatistics>>> {
    let filter = query.into_filter(state.config.timezone)?;
    let stats = state.statistics.get_statistics(&user, &filter).await?;
    Ok(ok(stats))
}

/// GET /api/commissions/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Commission>>> {
    let commission = state.commissions.get_commission(&user, id).await?;
    Ok(ok(commission))
}

/// POST /api/commissions
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CommissionCreate>,
) -> AppResult<Json<ApiResponse<Commission>>> {
    let commission = state.commissions.create_commission(&user, payload).await?;
    Ok(ok(commission))
}

/// PUT /api/commissions/{id}
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CommissionUpdate>,
) -> AppResult<Json<ApiResponse<Commission>>> {
    let commission = state.commissions.update_commission(&user, id, payload).await?;
    Ok(ok(commission))
}

/// DELETE /api/commissions/{id}
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<i64>>> {
    state.commissions.delete_commission(&user, id).await?;
    Ok(ok_with_message("Commission deleted", id))
}

/// POST /api/commissions/{id}/approve
pub async fn approve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Commission>>> {
    let commission = state.commissions.approve_commission(&user, id).await?;
    Ok(ok(commission))
}

/// POST /api/commissions/{id}/reject
pub async fn reject(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CommissionReject>,
) -> AppResult<Json<ApiResponse<Commission>>> {
    let commission = state.commissions.reject_commission(&user, id, payload).await?;
    Ok(ok(commission))
}

/// POST /api/commissions/{id}/pay
pub async fn pay(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CommissionPay>,
) -> AppResult<Json<ApiResponse<Commission>>> {
    let commission = state.commissions.pay_commission(&user, id, payload).await?;
    Ok(ok(commission))
}

/// POST /api/commissions/{id}/recalculate
pub async fn recalculate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Commission>>> {
    let commission = state.commissions.recalculate_commission(&user, id).await?;
    Ok(ok(commission))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ErrorCode;

    const TZ: Tz = chrono_tz::America::Sao_Paulo;

    #[test]
    fn end_date_is_inclusive() {
        let query = CommissionQuery {
            start_date: Some("2026-03-01".into()),
            end_date: Some("2026-03-01".into()),
            ..Default::default()
        };
        let filter = query.into_filter(TZ).unwrap();
        let (from, to) = (filter.created_from.unwrap(), filter.created_to.unwrap());
        assert_eq!(to - from, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn rejects_inverted_ranges() {
        let dates = CommissionQuery {
            start_date: Some("2026-03-02".into()),
            end_date: Some("2026-03-01".into()),
            ..Default::default()
        };
        assert_eq!(
            dates.into_filter(TZ).unwrap_err().code,
            ErrorCode::ValidationFailed
        );

        let values = CommissionQuery {
            min_value: Some(10.0),
            max_value: Some(5.0),
            ..Default::default()
        };
        assert!(values.into_filter(TZ).is_err());
    }

    #[test]
    fn malformed_date_is_rejected() {
        let query = CommissionQuery {
            start_date: Some("01/03/2026".into()),
            ..Default::default()
        };
        assert!(query.into_filter(TZ).is_err());
    }
}
