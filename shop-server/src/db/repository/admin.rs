//! Admin Repository

use super::{RepoError, RepoResult};
use crate::auth::password;
use crate::db::ShopStorage;
use shared::models::Admin;
use shared::util::{now_millis, snowflake_id};

#[derive(Clone, Debug)]
pub struct AdminRepository {
    storage: ShopStorage,
}

impl AdminRepository {
    pub fn new(storage: ShopStorage) -> Self {
        Self { storage }
    }

    pub fn find_by_username(&self, username: &str) -> RepoResult<Option<Admin>> {
        Ok(self.storage.get_admin(username)?)
    }

    /// Create an admin with an Argon2-hashed password
    pub fn create(&self, username: &str, plain_password: &str) -> RepoResult<Admin> {
        if self.find_by_username(username)?.is_some() {
            return Err(RepoError::Duplicate(format!("Admin '{}'", username)));
        }
        let password_hash = password::hash_password(plain_password)
            .map_err(|e| RepoError::Validation(e.to_string()))?;

        let admin = Admin {
            id: snowflake_id(),
            username: username.to_string(),
            password_hash,
            created_at: now_millis(),
            last_login_at: None,
        };
        self.storage.put_admin(&admin)?;
        Ok(admin)
    }

    pub fn record_login(&self, mut admin: Admin) -> RepoResult<Admin> {
        admin.last_login_at = Some(now_millis());
        self.storage.put_admin(&admin)?;
        Ok(admin)
    }

    /// Seed the first admin when the store has none
    ///
    /// Returns `true` if an admin was created.
    pub fn ensure_seed(&self, username: &str, plain_password: Option<&str>) -> RepoResult<bool> {
        if self.storage.admin_count()? > 0 {
            return Ok(false);
        }
        let Some(plain) = plain_password else {
            tracing::warn!("No admin account exists and ADMIN_PASSWORD is not set; admin login is disabled");
            return Ok(false);
        };
        self.create(username, plain)?;
        tracing::info!(username = %username, "Seeded initial admin account");
        Ok(true)
    }
}
