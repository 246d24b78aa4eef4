//! Commission API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/commissions | GET | 列表 (过滤) |
//! | /api/commissions | POST | 创建 (PENDING) |
//! | /api/commissions/statistics | GET | 统计 |
//! | /api/commissions/{id} | GET/PUT/DELETE | 查询 / 编辑 (PENDING) / 删除 |
//! | /api/commissions/{id}/approve | POST | PENDING → APPROVED |
//! | /api/commissions/{id}/reject | POST | PENDING → REJECTED |
//! | /api/commissions/{id}/pay | POST | APPROVED → PAID |
//! | /api/commissions/{id}/recalculate | POST | 重新计算 (PENDING) |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/commissions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/statistics", get(handler::statistics))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/pay", post(handler::pay))
        .route("/{id}/recalculate", post(handler::recalculate))
}
