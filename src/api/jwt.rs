use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AuthConfig;

/// Session token claims
///
/// Serialized field names are part of the wire contract: `/api/user-info`
/// echoes them back as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// JWT Service for generating and validating session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_hours: u64,
}

impl JwtService {
    pub fn new(secret: &str, token_ttl_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl_hours,
        }
    }

    /// Create JwtService from the `[auth]` config section
    pub fn from_config(config: &AuthConfig) -> Self {
        // 密钥为空时生成随机值，重启后旧令牌全部失效
        let secret = if config.jwt_secret.is_empty() {
            warn!(
                "JWT secret not configured, generating a random one; \
                 sessions will not survive restarts"
            );
            crate::utils::generate_secure_token()
        } else {
            config.jwt_secret.clone()
        };

        Self::new(&secret, config.token_ttl_hours)
    }

    pub fn token_ttl_hours(&self) -> u64 {
        self.token_ttl_hours
    }

    /// Issue a session token for the given user
    pub fn generate_token(
        &self,
        user_id: i64,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SessionClaims {
            user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_ttl_hours as i64)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate signature and expiry
    pub fn validate_token(
        &self,
        token: &str,
    ) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}
