//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 管理员登录
//! - [`shop`] - 店铺资料
//! - [`menu`] - 菜单管理
//! - [`orders`] - 收银下单 (积分累计)
//! - [`rewards`] - 奖励查询、兑换、重建
//! - [`customers`] - 顾客列表与详情
//! - [`dashboard`] - 仪表盘
//! - [`earnings`] - 营收分析
//! - [`upload`] - 图片上传与访问

pub mod auth;
pub mod health;
pub mod upload;

// Storefront / back-office
pub mod customers;
pub mod menu;
pub mod shop;

// Loyalty
pub mod orders;
pub mod rewards;

// Reports
pub mod dashboard;
pub mod earnings;

pub use crate::utils::{AppError, AppResult};

/// Run a blocking store call on the blocking pool
///
/// redb transactions block the calling thread, so handlers never touch the
/// store directly from the async executor.
pub(crate) async fn blocking<T, F>(f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(crate::utils::error::join_error)?
}
