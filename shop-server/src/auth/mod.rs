//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前管理员上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_admin`] - 管理员检查中间件
//! - [`password`] - Argon2 密码哈希
//! - [`verification`] - 登录人机验证

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod verification;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUserExt, require_admin, require_auth};
pub use verification::{HumanVerifier, NoopVerifier, RemoteVerifier, VerificationError};
