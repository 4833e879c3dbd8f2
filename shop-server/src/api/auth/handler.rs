//! Authentication Handlers
//!
//! Admin login and token introspection

use std::time::Duration;

use axum::{Json, extract::State};

use crate::AppError;
use crate::api::blocking;
use crate::auth::{CurrentUser, VerificationError, password};
use crate::core::ServerState;
use crate::db::repository::AdminRepository;
use crate::security_log;
use crate::utils::validation::{MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use shared::ErrorCode;

// Re-use shared DTOs for API consistency
use shared::client::{AdminInfo, LoginRequest, LoginResponse};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login handler
///
/// Checks the human-verification token, then the password, and returns a
/// JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = req.username.trim().to_string();
    validate_required_text(&username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;

    if let Err(e) = state.verifier.verify(req.verification_token.as_deref()).await {
        security_log!(
            "WARN",
            "verification_failed",
            username = username.clone(),
            error = format!("{}", e)
        );
        return Err(match e {
            VerificationError::Provider(_) => {
                AppError::with_message(ErrorCode::VerificationFailed, "Verification provider unavailable")
            }
            _ => AppError::new(ErrorCode::VerificationFailed),
        });
    }

    // Lookup + Argon2 verify both block
    let repo = AdminRepository::new(state.storage.clone());
    let lookup_name = username.clone();
    let plain = req.password;
    let admin = blocking(move || {
        let Some(admin) = repo.find_by_username(&lookup_name)? else {
            return Ok(None);
        };
        let valid = password::verify_password(&plain, &admin.password_hash)
            .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Ok(None);
        }
        Ok(Some(repo.record_login(admin)?))
    })
    .await;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let admin = match admin? {
        Some(admin) => admin,
        None => {
            security_log!("WARN", "login_failed", username = username.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service
        .generate_token(admin.id, &admin.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        admin_id = %admin.id,
        username = %admin.username,
        "Admin logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt_service.expires_in_seconds(),
        admin: AdminInfo::from(&admin),
    }))
}

/// Get current admin info
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<AdminInfo>, AppError> {
    let repo = AdminRepository::new(state.storage.clone());
    let username = user.username.clone();
    let admin = blocking(move || Ok(repo.find_by_username(&username)?))
        .await?
        .ok_or_else(|| AppError::not_found(format!("Admin {}", user.username)))?;

    Ok(Json(AdminInfo::from(&admin)))
}
