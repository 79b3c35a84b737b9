use crate::entities::user_entity as users;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "student@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    #[schema(example = "Password123")]
    pub password_confirm: String,
    #[schema(example = "Ivan")]
    pub first_name: Option<String>,
    #[schema(example = "Petrov")]
    pub last_name: Option<String>,
    #[schema(example = "+79991234567")]
    pub phone: Option<String>,
    #[schema(example = "Moscow")]
    pub city: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "student@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// 完整的用户资料（仅本人可见）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_moderator: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: Option<DateTime<Utc>>,
}

/// 公开的用户资料（他人查看时的裁剪字段集）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicUserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub city: Option<String>,
}

/// 资料读取结果，按 is_self 决定字段裁剪
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Full(UserResponse),
    Public(PublicUserResponse),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            city: user.city,
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_moderator: user.is_moderator,
            last_login: user.last_login,
            date_joined: user.date_joined,
        }
    }
}

impl From<users::Model> for PublicUserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            city: user.city,
        }
    }
}
