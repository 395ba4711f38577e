use crate::models::users::entities::{User, UserRole};
use serde::Serialize;
use ts_rs::TS;

// 登录成功后返回访问令牌，刷新令牌只放在 HttpOnly cookie 中
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    /// 访问令牌剩余秒数
    pub expires_in: i64,
    /// 刷新令牌剩余秒数
    pub refresh_expires_in: i64,
    pub user: User,
    pub issued_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}

// 令牌有效时附带身份，前端据此决定展示学员端或管理端
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct TokenVerificationResponse {
    pub is_valid: bool,
    pub user_id: i64,
    pub role: UserRole,
}
