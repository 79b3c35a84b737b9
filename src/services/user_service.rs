use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::permissions::{Actor, load_actor};
use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 获取当前用户的完整资料
    pub async fn get_me(&self, user_id: i64) -> AppResult<UserResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        let user = self.find_user(actor.id).await?;
        Ok(UserResponse::from(user))
    }

    /// 读取任意用户资料，非本人时返回裁剪后的字段集
    pub async fn get_profile(&self, user_id: i64, target_id: i64) -> AppResult<ProfileResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        let user = self.find_user(target_id).await?;

        if actor.is_self(user.id) {
            Ok(ProfileResponse::Full(UserResponse::from(user)))
        } else {
            Ok(ProfileResponse::Public(PublicUserResponse::from(user)))
        }
    }

    /// 更新当前用户资料
    pub async fn update_me(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        let actor = load_actor(&self.pool, user_id).await?;

        if request.first_name.is_none()
            && request.last_name.is_none()
            && request.phone.is_none()
            && request.city.is_none()
        {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let mut model = self.find_user(actor.id).await?.into_active_model();
        if let Some(first_name) = request.first_name {
            model.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = request.last_name {
            model.last_name = Set(Some(last_name));
        }
        if let Some(phone) = request.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(city) = request.city {
            model.city = Set(Some(city));
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(UserResponse::from(updated))
    }

    /// 用户列表，对所有已认证用户开放裁剪字段
    pub async fn list_users(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<PublicUserResponse>> {
        let _actor = load_actor(&self.pool, user_id).await?;

        let total = users::Entity::find().count(&self.pool).await? as i64;

        let models = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<PublicUserResponse> =
            models.into_iter().map(PublicUserResponse::from).collect();

        Ok(PaginatedResponse::from_params(items, params, total))
    }

    /// 管理端手动触发停用任务
    pub async fn run_deactivation(&self, user_id: i64) -> AppResult<u64> {
        let actor = load_actor(&self.pool, user_id).await?;
        self.require_admin(&actor)?;
        self.deactivate_inactive_users().await
    }

    /// 停用超过 30 天未登录的用户，staff/superuser 永不停用
    pub async fn deactivate_inactive_users(&self) -> AppResult<u64> {
        let cutoff = deactivation_cutoff(Utc::now());

        let result = users::Entity::update_many()
            .col_expr(users::Column::IsActive, Expr::value(false))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::IsActive.eq(true))
            .filter(users::Column::IsStaff.eq(false))
            .filter(users::Column::IsSuperuser.eq(false))
            .filter(users::Column::LastLogin.lt(cutoff))
            .exec(&self.pool)
            .await?;

        Ok(result.rows_affected)
    }

    fn require_admin(&self, actor: &Actor) -> AppResult<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    async fn find_user(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

/// 未登录天数阈值：30 天
fn deactivation_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(30)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deactivation_cutoff() {
        let now = Utc::now();
        let cutoff = deactivation_cutoff(now);
        assert_eq!(now - cutoff, Duration::days(30));

        // 29 天前登录的用户不应命中 last_login < cutoff
        let recent_login = now - Duration::days(29);
        assert!(recent_login > cutoff);
        let stale_login = now - Duration::days(31);
        assert!(stale_login < cutoff);
    }
}
