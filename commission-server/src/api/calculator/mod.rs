//! Calculator API 模块
//!
//! 无副作用，结果不持久化

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/calculator", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/commission", post(handler::commission))
        .route("/breakdown", post(handler::breakdown))
        .route("/simulate", post(handler::simulate))
}
