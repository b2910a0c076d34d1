//! Auth service: credential check, session token issue and verification

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::jwt::{JwtService, SessionClaims};
use crate::errors::{GeoTrackerError, Result};
use crate::storage::{SeaOrmStorage, User};
use crate::utils::password::{dummy_hash, hash_password, is_argon2_hash, verify_password};

/// 登录成功的结果
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(storage: Arc<SeaOrmStorage>, jwt: Arc<JwtService>) -> Self {
        Self { storage, jwt }
    }

    /// 校验邮箱和密码，成功时签发会话令牌
    ///
    /// 邮箱不存在与密码错误返回同一个 `InvalidCredentials`。
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let candidate = self.storage.find_user_by_email(email).await?;

        let stored = candidate
            .as_ref()
            .map(|user| user.password_hash.clone())
            .filter(|hash| {
                let ok = is_argon2_hash(hash);
                if !ok {
                    warn!("Stored password for {} is not an Argon2 hash", email);
                }
                ok
            });
        let usable = stored.is_some();

        // 没有可用哈希时仍对 dummy hash 做一次校验，结果丢弃
        let hash = stored.or_else(|| dummy_hash().map(String::from));
        let verified = match hash {
            Some(hash) => {
                let password = password.to_string();
                tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??
            }
            None => false,
        };
        let matches = usable && verified;

        let user = match candidate {
            Some(user) if matches => user,
            _ => {
                debug!("Login rejected for {}", email);
                return Err(GeoTrackerError::invalid_credentials());
            }
        };

        let token = self.jwt.generate_token(user.id, &user.email)?;
        info!("User {} logged in", user.id);

        Ok(LoginOutcome { token, user })
    }

    /// 验证会话令牌，失败统一返回 `Invalid token`
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        self.jwt
            .validate_token(token)
            .map_err(|_| GeoTrackerError::invalid_token())
    }
}

/// 创建账户（seed 命令直接使用，不需要 JWT）
pub async fn register_user(storage: &SeaOrmStorage, email: &str, password: &str) -> Result<User> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') || password.is_empty() {
        return Err(GeoTrackerError::InvalidRequest(
            "A valid email and a non-empty password are required".to_string(),
        ));
    }

    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    storage.create_user(email, &hash).await
}
