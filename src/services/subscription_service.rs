use crate::entities::{course_entity as courses, subscription_entity as subscriptions};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::permissions::load_actor;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

#[derive(Clone)]
pub struct SubscriptionService {
    pool: DatabaseConnection,
}

impl SubscriptionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 订阅课程。重复订阅不报错，返回已有记录并标记 created=false。
    ///
    /// 用条件插入而不是先查后插，避免并发订阅打破唯一约束。
    pub async fn subscribe(&self, user_id: i64, course_id: i64) -> AppResult<SubscribeResponse> {
        let actor = load_actor(&self.pool, user_id).await?;

        let course = courses::Entity::find_by_id(course_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let insert_result = subscriptions::Entity::insert(subscriptions::ActiveModel {
            user_id: Set(actor.id),
            course_id: Set(course.id),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                subscriptions::Column::UserId,
                subscriptions::Column::CourseId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec(&self.pool)
        .await;

        let created = match insert_result {
            Ok(_) => true,
            // 已存在同一 (user, course) 记录
            Err(DbErr::RecordNotInserted) => false,
            Err(e) => return Err(e.into()),
        };

        let subscription = self
            .find_subscription(actor.id, course.id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError("Subscription missing after insert".to_string())
            })?;

        Ok(SubscribeResponse {
            subscription: SubscriptionResponse::from(subscription),
            created,
        })
    }

    /// 退订课程，没有订阅记录时返回 404
    pub async fn unsubscribe(&self, user_id: i64, course_id: i64) -> AppResult<()> {
        let actor = load_actor(&self.pool, user_id).await?;

        let result = subscriptions::Entity::delete_many()
            .filter(subscriptions::Column::UserId.eq(actor.id))
            .filter(subscriptions::Column::CourseId.eq(course_id))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Subscription not found".to_string()));
        }

        Ok(())
    }

    /// 当前用户的订阅列表，订阅永远只对本人可见
    pub async fn list_subscriptions(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<SubscriptionResponse>> {
        let actor = load_actor(&self.pool, user_id).await?;

        let total = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(actor.id))
            .count(&self.pool)
            .await? as i64;

        let models = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(actor.id))
            .order_by_desc(subscriptions::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<SubscriptionResponse> = models
            .into_iter()
            .map(SubscriptionResponse::from)
            .collect();

        Ok(PaginatedResponse::from_params(items, params, total))
    }

    async fn find_subscription(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> AppResult<Option<subscriptions::Model>> {
        let subscription = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::CourseId.eq(course_id))
            .one(&self.pool)
            .await?;
        Ok(subscription)
    }
}
