//! Human verification for the admin login form
//!
//! The login form carries a challenge token issued by a third-party widget;
//! the server confirms it with the provider's verify endpoint before checking
//! the password.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Verification token missing")]
    MissingToken,

    #[error("Verification rejected: {0}")]
    Rejected(String),

    #[error("Verification provider unreachable: {0}")]
    Provider(#[from] reqwest::Error),
}

#[async_trait]
pub trait HumanVerifier: Send + Sync + std::fmt::Debug {
    /// Confirm a client-supplied challenge token
    async fn verify(&self, token: Option<&str>) -> Result<(), VerificationError>;
}

/// Accepts every request; used when no provider secret is configured
#[derive(Debug, Default)]
pub struct NoopVerifier;

#[async_trait]
impl HumanVerifier for NoopVerifier {
    async fn verify(&self, _token: Option<&str>) -> Result<(), VerificationError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Siteverify-style provider (form POST of `secret` + `response`)
#[derive(Debug, Clone)]
pub struct RemoteVerifier {
    client: reqwest::Client,
    url: String,
    secret: String,
}

impl RemoteVerifier {
    pub fn new(url: impl Into<String>, secret: impl Into<String>) -> Result<Self, VerificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            secret: secret.into(),
        })
    }
}

#[async_trait]
impl HumanVerifier for RemoteVerifier {
    async fn verify(&self, token: Option<&str>) -> Result<(), VerificationError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(VerificationError::MissingToken)?;

        let resp: SiteVerifyResponse = self
            .client
            .post(&self.url)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await?
            .json()
            .await?;

        if resp.success {
            Ok(())
        } else {
            Err(VerificationError::Rejected(resp.error_codes.join(",")))
        }
    }
}
