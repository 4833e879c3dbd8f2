//! 服务层 - 服务器核心服务
//!
//! # 服务列表
//!
//! - [`http_server`] - 路由组装、中间件栈与 HTTP 服务器
//! - [`ImageStore`] - 上传图片的本地存储 (内容寻址)

pub mod http_server;
pub mod image_store;

pub use image_store::{ImageStore, ImageStoreError, StoredImage};
