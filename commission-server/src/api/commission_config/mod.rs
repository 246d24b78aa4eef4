//! Commission Config API 模块
//!
//! 每个公司最多一个生效配置；删除为软停用

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/commission-config", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route(
        "/",
        get(handler::get)
            .post(handler::create)
            .put(handler::update)
            .delete(handler::deactivate),
    )
}
