use crate::entities::lesson_entity as lessons;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateLessonRequest {
    #[schema(example = "Введение")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "https://www.youtube.com/watch?v=abc123")]
    pub video_url: Option<String>,
    pub course: i64,
    /// 不传时自动取课程内最大序号加一
    pub order: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LessonResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub course: i64,
    pub order: i32,
    pub owner: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LessonQuery {
    pub course: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl From<lessons::Model> for LessonResponse {
    fn from(lesson: lessons::Model) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title,
            description: lesson.description,
            video_url: lesson.video_url,
            course: lesson.course_id,
            order: lesson.order,
            owner: lesson.owner_id,
            created_at: lesson.created_at,
        }
    }
}
