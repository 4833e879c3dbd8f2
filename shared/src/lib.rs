//! Shared types for the juice shop back-office
//!
//! Domain models, the reward progress rule, the unified error system and the
//! DTOs exchanged between the shop server and its clients.

pub mod client;
pub mod error;
pub mod models;
pub mod pagination;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
pub use http;
pub use pagination::{PageRequest, PaginatedResponse};
pub use serde::{Deserialize, Serialize};
