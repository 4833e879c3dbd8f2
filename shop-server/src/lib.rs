//! Juice Shop Server - 果汁店后台服务
//!
//! # 架构概述
//!
//! - **存储** (`db`): 嵌入式 redb 文档存储 (客户、菜单、管理员、店铺)
//! - **积分账本** (`loyalty`): 买五送一的奖励计数器，唯一的写入口
//! - **报表** (`reports`): 仪表盘、奖励列表、营收分析 (只读快照)
//! - **认证** (`auth`): JWT + Argon2 + 人机验证
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! shop-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、密码、人机验证
//! ├── db/            # redb 存储层
//! ├── loyalty/       # 奖励账本
//! ├── reports/       # 只读报表
//! ├── services/      # HTTP 路由组装、图片存储
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、时间、金额、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod loyalty;
pub mod reports;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::ShopStorage;
pub use loyalty::RewardLedger;
pub use reports::ReportService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env、确保工作目录存在、初始化日志
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
     _       _             ____  _
    | |_   _(_) ___ ___   / ___|| |__   ___  _ __
 _  | | | | | |/ __/ _ \  \___ \| '_ \ / _ \| '_ \
| |_| | |_| | | (_|  __/   ___) | | | | (_) | |_) |
 \___/ \__,_|_|\___\___|  |____/|_| |_|\___/| .__/
                                            |_|
    "#
    );
}
