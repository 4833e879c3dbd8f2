//! Rewards API 模块 (奖励查询、兑换、重建)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/rewards", routes())
}

fn routes() -> Router<ServerState> {
    // 公共：顾客按手机号查询进度
    let public_routes = Router::new().route("/lookup", get(handler::lookup));

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/claim", post(handler::claim))
        .route("/rebuild", post(handler::rebuild))
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(admin_routes)
}
