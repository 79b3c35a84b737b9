use crate::entities::{course_entity as courses, lesson_entity as lessons};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::permissions::{Action, check_content, content_scope, load_actor};
use crate::services::NotificationService;
use crate::utils::validate_video_url;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct LessonService {
    pool: DatabaseConnection,
    notifications: NotificationService,
}

impl LessonService {
    pub fn new(pool: DatabaseConnection, notifications: NotificationService) -> Self {
        Self {
            pool,
            notifications,
        }
    }

    /// 课时列表，按角色过滤可见集，可按课程筛选
    pub async fn list_lessons(
        &self,
        user_id: i64,
        query: &LessonQuery,
    ) -> AppResult<PaginatedResponse<LessonResponse>> {
        let actor = load_actor(&self.pool, user_id).await?;
        let params = PaginationParams::new(query.page, query.page_size);

        let mut find = lessons::Entity::find();
        if let Some(owner_id) = content_scope(&actor) {
            find = find.filter(lessons::Column::OwnerId.eq(owner_id));
        }
        if let Some(course_id) = query.course {
            find = find.filter(lessons::Column::CourseId.eq(course_id));
        }

        let total = find.clone().count(&self.pool).await? as i64;

        let models = find
            .order_by_asc(lessons::Column::CourseId)
            .order_by_asc(lessons::Column::Order)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<LessonResponse> = models.into_iter().map(LessonResponse::from).collect();

        Ok(PaginatedResponse::from_params(items, &params, total))
    }

    pub async fn get_lesson(&self, user_id: i64, lesson_id: i64) -> AppResult<LessonResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        let lesson = self.find_lesson(lesson_id).await?;
        check_content(&actor, Action::ReadDetail, lesson.owner_id, "Lesson")?;

        Ok(LessonResponse::from(lesson))
    }

    /// 创建课时并通知课程订阅者
    pub async fn create_lesson(
        &self,
        user_id: i64,
        request: CreateLessonRequest,
    ) -> AppResult<LessonResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        check_content(&actor, Action::Create, None, "Lesson")?;

        if request.title.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Lesson title must not be empty".to_string(),
            ));
        }
        validate_video_url(request.video_url.as_deref())?;

        // 目标课程必须存在且对操作者可见
        let course = courses::Entity::find_by_id(request.course)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
        check_content(&actor, Action::ReadDetail, course.owner_id, "Course")?;

        let order = match request.order {
            Some(order) if order < 0 => {
                return Err(AppError::ValidationError(
                    "Lesson order must be a positive integer".to_string(),
                ));
            }
            // 0 与缺省一样视作未指定
            Some(order) if order > 0 => order,
            _ => next_order(self.max_order(course.id).await?),
        };

        let now = Utc::now();
        let lesson = lessons::ActiveModel {
            course_id: Set(course.id),
            title: Set(request.title),
            description: Set(request.description),
            video_url: Set(request.video_url),
            order: Set(order),
            owner_id: Set(Some(actor.id)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        // 订阅者通知走后台任务，不阻塞请求
        self.notifications
            .notify_course_update(course.id, lesson.title.clone());

        Ok(LessonResponse::from(lesson))
    }

    pub async fn update_lesson(
        &self,
        user_id: i64,
        lesson_id: i64,
        request: UpdateLessonRequest,
    ) -> AppResult<LessonResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        let lesson = self.find_lesson(lesson_id).await?;
        check_content(&actor, Action::Update, lesson.owner_id, "Lesson")?;

        if let Some(title) = &request.title
            && title.trim().is_empty()
        {
            return Err(AppError::ValidationError(
                "Lesson title must not be empty".to_string(),
            ));
        }
        validate_video_url(request.video_url.as_deref())?;
        if let Some(order) = request.order
            && order < 1
        {
            return Err(AppError::ValidationError(
                "Lesson order must be a positive integer".to_string(),
            ));
        }

        let mut model = lesson.into_active_model();
        if let Some(title) = request.title {
            model.title = Set(title);
        }
        if let Some(description) = request.description {
            model.description = Set(Some(description));
        }
        if let Some(video_url) = request.video_url {
            model.video_url = Set(Some(video_url));
        }
        if let Some(order) = request.order {
            model.order = Set(order);
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(LessonResponse::from(updated))
    }

    /// 删除课时，不重排剩余课时的序号
    pub async fn delete_lesson(&self, user_id: i64, lesson_id: i64) -> AppResult<()> {
        let actor = load_actor(&self.pool, user_id).await?;
        let lesson = self.find_lesson(lesson_id).await?;
        check_content(&actor, Action::Delete, lesson.owner_id, "Lesson")?;

        lesson.delete(&self.pool).await?;
        Ok(())
    }

    async fn find_lesson(&self, lesson_id: i64) -> AppResult<lessons::Model> {
        lessons::Entity::find_by_id(lesson_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))
    }

    async fn max_order(&self, course_id: i64) -> AppResult<Option<i32>> {
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct MaxRow {
            max_order: Option<i32>,
        }
        let row = lessons::Entity::find()
            .filter(lessons::Column::CourseId.eq(course_id))
            .select_only()
            .column_as(lessons::Column::Order.max(), "max_order")
            .into_model::<MaxRow>()
            .one(&self.pool)
            .await?;

        Ok(row.and_then(|r| r.max_order))
    }
}

/// 课程内下一个课时序号：现有最大序号加一，空课程从 1 开始
fn next_order(current_max: Option<i32>) -> i32 {
    current_max.map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_order_empty_course() {
        assert_eq!(next_order(None), 1);
    }

    #[test]
    fn test_next_order_appends_after_max() {
        assert_eq!(next_order(Some(1)), 2);
        assert_eq!(next_order(Some(7)), 8);
    }
}
