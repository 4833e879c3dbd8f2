//! Orders API 模块 (收银下单)
//!
//! 每次下单记录一杯饮品并累计该品类的奖励计数。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// POST /api/orders 为公共接口 (收银台无需登录)
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/orders", post(handler::create))
}
