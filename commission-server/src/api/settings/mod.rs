//! Personal Settings API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/settings",
        get(handler::load).put(handler::save).delete(handler::reset),
    )
}
