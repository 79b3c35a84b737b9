use crate::entities::course_entity as courses;
use crate::models::LessonResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    #[schema(example = "Rust для начинающих")]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub owner: Option<i64>,
    pub lessons_count: i64,
    pub is_subscribed: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 课程详情，内嵌课时列表
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseDetailResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub owner: Option<i64>,
    pub lessons_count: i64,
    pub is_subscribed: bool,
    pub lessons: Vec<LessonResponse>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CourseResponse {
    pub fn from_model(course: courses::Model, lessons_count: i64, is_subscribed: bool) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            owner: course.owner_id,
            lessons_count,
            is_subscribed,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

impl CourseDetailResponse {
    pub fn from_model(
        course: courses::Model,
        lessons: Vec<LessonResponse>,
        is_subscribed: bool,
    ) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            owner: course.owner_id,
            lessons_count: lessons.len() as i64,
            is_subscribed,
            lessons,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}
