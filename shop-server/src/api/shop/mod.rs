//! Shop Profile API 模块 (店铺资料)

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/shop", routes())
}

fn routes() -> Router<ServerState> {
    // 公共：顾客端读取店铺资料
    let public_routes = Router::new().route("/", get(handler::get));

    let admin_routes = Router::new()
        .route("/", put(handler::update))
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(admin_routes)
}
