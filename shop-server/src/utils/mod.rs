//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`ErrorBody`] - 统一错误与错误响应体 (from shared::error)
//! - [`logger`] - 日志初始化
//! - [`time`] - 店铺时区与时间窗口
//! - [`money`] - Decimal 金额计算
//! - [`validation`] - 输入校验

pub mod error;
pub mod logger;
pub mod money;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
