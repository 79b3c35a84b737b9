use crate::entities::{
    course_entity as courses, lesson_entity as lessons, subscription_entity as subscriptions,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::permissions::{Action, check_content, content_scope, load_actor};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct CourseService {
    pool: DatabaseConnection,
}

impl CourseService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 课程列表，按角色过滤可见集
    pub async fn list_courses(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<CourseResponse>> {
        let actor = load_actor(&self.pool, user_id).await?;

        let mut query = courses::Entity::find();
        if let Some(owner_id) = content_scope(&actor) {
            query = query.filter(courses::Column::OwnerId.eq(owner_id));
        }

        let total = query.clone().count(&self.pool).await? as i64;

        let models = query
            .order_by_desc(courses::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(models.len());
        for course in models {
            let lessons_count = self.lessons_count(course.id).await?;
            let is_subscribed = self.is_subscribed(actor.id, course.id).await?;
            items.push(CourseResponse::from_model(
                course,
                lessons_count,
                is_subscribed,
            ));
        }

        Ok(PaginatedResponse::from_params(items, params, total))
    }

    /// 课程详情，内嵌按序号排序的课时
    pub async fn get_course(&self, user_id: i64, course_id: i64) -> AppResult<CourseDetailResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        let course = self.find_course(course_id).await?;
        check_content(&actor, Action::ReadDetail, course.owner_id, "Course")?;

        let lesson_models = lessons::Entity::find()
            .filter(lessons::Column::CourseId.eq(course.id))
            .order_by_asc(lessons::Column::Order)
            .all(&self.pool)
            .await?;
        let lesson_items: Vec<LessonResponse> =
            lesson_models.into_iter().map(LessonResponse::from).collect();

        let is_subscribed = self.is_subscribed(actor.id, course.id).await?;

        Ok(CourseDetailResponse::from_model(
            course,
            lesson_items,
            is_subscribed,
        ))
    }

    /// 创建课程，创建者成为所有者；版主不能创建
    pub async fn create_course(
        &self,
        user_id: i64,
        request: CreateCourseRequest,
    ) -> AppResult<CourseResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        check_content(&actor, Action::Create, None, "Course")?;

        if request.title.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Course title must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let course = courses::ActiveModel {
            title: Set(request.title),
            description: Set(request.description),
            owner_id: Set(Some(actor.id)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(CourseResponse::from_model(course, 0, false))
    }

    pub async fn update_course(
        &self,
        user_id: i64,
        course_id: i64,
        request: UpdateCourseRequest,
    ) -> AppResult<CourseResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        let course = self.find_course(course_id).await?;
        check_content(&actor, Action::Update, course.owner_id, "Course")?;

        if let Some(title) = &request.title
            && title.trim().is_empty()
        {
            return Err(AppError::ValidationError(
                "Course title must not be empty".to_string(),
            ));
        }

        let mut model = course.into_active_model();
        if let Some(title) = request.title {
            model.title = Set(title);
        }
        if let Some(description) = request.description {
            model.description = Set(Some(description));
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        let lessons_count = self.lessons_count(updated.id).await?;
        let is_subscribed = self.is_subscribed(actor.id, updated.id).await?;
        Ok(CourseResponse::from_model(
            updated,
            lessons_count,
            is_subscribed,
        ))
    }

    /// 删除课程，课时随之级联删除
    pub async fn delete_course(&self, user_id: i64, course_id: i64) -> AppResult<()> {
        let actor = load_actor(&self.pool, user_id).await?;
        let course = self.find_course(course_id).await?;
        check_content(&actor, Action::Delete, course.owner_id, "Course")?;

        course.delete(&self.pool).await?;
        Ok(())
    }

    async fn find_course(&self, course_id: i64) -> AppResult<courses::Model> {
        courses::Entity::find_by_id(course_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }

    async fn lessons_count(&self, course_id: i64) -> AppResult<i64> {
        let count = lessons::Entity::find()
            .filter(lessons::Column::CourseId.eq(course_id))
            .count(&self.pool)
            .await?;
        Ok(count as i64)
    }

    async fn is_subscribed(&self, user_id: i64, course_id: i64) -> AppResult<bool> {
        let existing = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::CourseId.eq(course_id))
            .one(&self.pool)
            .await?;
        Ok(existing.is_some())
    }
}
