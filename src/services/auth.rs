use crate::{
    config::Config,
    error::{AppError, Result},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// 认证服务
/// 会话本身由 OnAir-Auth 管理，这里只校验它签发的令牌
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户ID
    pub exp: i64,           // 过期时间
    pub iat: i64,           // 签发时间
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// 权限等级
/// Staff 和 Admin 可以越过按作者的所有权检查
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl Role {
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
}

impl AuthService {
    pub async fn new(config: &Config) -> Result<Self> {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// 校验令牌并还原当前用户
    pub fn verify_token(&self, token: &str) -> Result<User> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Authentication("Invalid subject in token".to_string()))?;

        debug!("Verified token for user: {}", id);

        Ok(User {
            id,
            email: claims.email.unwrap_or_default(),
            display_name: claims.name,
            role: claims.role.unwrap_or_default(),
        })
    }
}

/// 检查当前用户是否具备 staff/admin 权限
#[macro_export]
macro_rules! require_staff {
    ($user:expr) => {
        if !$user.role.is_staff() {
            return Err($crate::error::AppError::Authorization(
                "Staff or admin role required".to_string(),
            ));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_is_staff() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Staff.is_staff());
        assert!(!Role::User.is_staff());
    }

    #[test]
    fn test_role_deserializes_lowercase() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        let role: Role = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(role, Role::Staff);
    }
}
