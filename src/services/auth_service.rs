use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    /// 自助注册，注册后即为普通用户
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        if request.password != request.password_confirm {
            return Err(AppError::ValidationError(
                "Passwords do not match".to_string(),
            ));
        }

        // 检查邮箱是否已注册
        let existing_user = users::Entity::find()
            .filter(users::Column::Email.eq(request.email.clone()))
            .one(&self.pool)
            .await?;

        if existing_user.is_some() {
            return Err(AppError::ValidationError(
                "Email already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;

        let now = Utc::now();
        let user = users::ActiveModel {
            email: Set(request.email),
            password_hash: Set(password_hash),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            phone: Set(request.phone),
            city: Set(request.city),
            is_active: Set(true),
            is_staff: Set(false),
            is_superuser: Set(false),
            is_moderator: Set(false),
            last_login: Set(None),
            date_joined: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        let access_token = self.jwt_service.generate_access_token(user.id, &user.email)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.id, &user.email)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(request.email.clone()))
            .one(&self.pool)
            .await?;

        let user =
            user.ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        let is_valid = verify_password(&request.password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        if !user.is_active {
            return Err(AppError::AuthError("Account is deactivated".to_string()));
        }

        // 记录登录时间，周期性的停用任务依赖该字段
        let mut model = user.clone().into_active_model();
        model.last_login = Set(Some(Utc::now()));
        let user = model.update(&self.pool).await?;

        let access_token = self.jwt_service.generate_access_token(user.id, &user.email)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.id, &user.email)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !user.is_active {
            return Err(AppError::AuthError("Account is deactivated".to_string()));
        }

        let access_token = self.jwt_service.generate_access_token(user.id, &user.email)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}
