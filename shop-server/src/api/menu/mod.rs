//! Menu API 模块 (菜单管理)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    // 公共：顾客端和收银台读取在售商品
    let public_routes = Router::new()
        .route("/", get(handler::list))
        .route("/categories", get(handler::categories))
        .route("/{id}", get(handler::get_by_id));

    // 管理员：含下架商品的完整列表与增删改
    let admin_routes = Router::new()
        .route("/all", get(handler::list_all))
        .route("/", axum::routing::post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(admin_routes)
}
