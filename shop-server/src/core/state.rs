use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{HumanVerifier, JwtService, NoopVerifier, RemoteVerifier};
use crate::core::Config;
use crate::db::ShopStorage;
use crate::db::repository::AdminRepository;
use crate::loyalty::RewardLedger;
use crate::reports::ReportService;
use crate::services::ImageStore;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc / 内部共享实现浅拷贝，每个请求克隆一份成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | storage | ShopStorage | 嵌入式数据库 (redb) |
/// | ledger | RewardLedger | 积分账本 (唯一写入者) |
/// | reports | ReportService | 只读报表 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | verifier | Arc<dyn HumanVerifier> | 登录人机验证 |
/// | images | ImageStore | 上传图片目录 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (redb)
    pub storage: ShopStorage,
    /// 积分账本
    pub ledger: RewardLedger,
    /// 报表服务
    pub reports: ReportService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 人机验证 (未配置密钥时为 NoopVerifier)
    pub verifier: Arc<dyn HumanVerifier>,
    /// 图片存储
    pub images: ImageStore,
}

impl ServerState {
    /// 由已打开的存储构造状态
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 代替；测试直接传入临时存储。
    pub fn new(config: Config, storage: ShopStorage, verifier: Arc<dyn HumanVerifier>) -> Self {
        let ledger = RewardLedger::new(storage.clone());
        let reports = ReportService::new(storage.clone(), config.report_timeout(), config.timezone);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let images = ImageStore::new(config.images_dir());

        Self {
            config,
            storage,
            ledger,
            reports,
            jwt_service,
            verifier,
            images,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库 (work_dir/database/shop.redb)
    /// 2. 人机验证 (VERIFICATION_SECRET 未设置时跳过)
    /// 3. 首个管理员账号 (仅当库中没有管理员)
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db_path = config.database_path();
        let storage = tokio::task::spawn_blocking(move || ShopStorage::open(db_path)).await??;
        tracing::info!(path = %config.database_path().display(), "Database opened");

        let verifier: Arc<dyn HumanVerifier> = match &config.verification_secret {
            Some(secret) => Arc::new(RemoteVerifier::new(&config.verification_url, secret)?),
            None => {
                tracing::warn!("VERIFICATION_SECRET not set; login human verification disabled");
                Arc::new(NoopVerifier)
            }
        };

        let admins = AdminRepository::new(storage.clone());
        let username = config.admin_username.clone();
        let password = config.admin_password.clone();
        tokio::task::spawn_blocking(move || admins.ensure_seed(&username, password.as_deref()))
            .await??;

        Ok(Self::new(config.clone(), storage, verifier))
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 对外图片 URL: `{PUBLIC_BASE_URL}/api/image/{file}`
    pub fn image_url(&self, filename: &str) -> String {
        format!("{}/api/image/{}", self.config.public_base_url, filename)
    }
}
