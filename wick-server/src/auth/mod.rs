//! Authentication
//!
//! JWT + Argon2 认证体系：
//! - [`jwt`] - 令牌签发与验证
//! - [`password`] - 密码哈希
//! - [`middleware`] - 全局认证中间件
//! - [`extractor`] - 处理器内的用户提取器

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use extractor::AdminUser;
pub use jwt::{Claims, JwtConfig, JwtService};
pub use middleware::require_auth;
pub use password::{hash_password, verify_password};

use surrealdb::RecordId;

/// Authenticated caller, decoded from JWT claims
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// "user:xyz"
    pub id: String,
    pub name: String,
    pub is_admin: bool,
}

impl CurrentUser {
    /// The caller's user record id
    pub fn record_id(&self) -> Result<RecordId, crate::AppError> {
        self.id
            .parse::<RecordId>()
            .map_err(|_| crate::AppError::invalid_token("Malformed subject in token"))
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            is_admin: claims.is_admin,
        }
    }
}
