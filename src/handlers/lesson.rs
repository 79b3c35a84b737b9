use crate::models::*;
use crate::services::LessonService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn get_user_id_from_request(req: &HttpRequest) -> Option<i64> {
    req.extensions().get::<i64>().copied()
}

#[utoipa::path(
    get,
    path = "/lessons",
    tag = "lesson",
    params(
        ("course" = Option<i64>, Query, description = "按课程筛选"),
        ("page" = Option<i64>, Query, description = "页码"),
        ("page_size" = Option<i64>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取课时列表成功，普通用户只能看到自己的课时"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_lessons(
    lesson_service: web::Data<LessonService>,
    req: HttpRequest,
    query: web::Query<LessonQuery>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match lesson_service
        .list_lessons(user_id, &query.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/lessons",
    tag = "lesson",
    request_body = CreateLessonRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建课时成功，课程订阅者会收到邮件通知", body = LessonResponse),
        (status = 400, description = "请求参数错误，例如非 YouTube 视频链接"),
        (status = 403, description = "版主不能创建课时"),
        (status = 404, description = "课程不存在")
    )
)]
pub async fn create_lesson(
    lesson_service: web::Data<LessonService>,
    req: HttpRequest,
    request: web::Json<CreateLessonRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match lesson_service
        .create_lesson(user_id, request.into_inner())
        .await
    {
        Ok(lesson) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "lesson": lesson
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/lessons/{id}",
    tag = "lesson",
    params(
        ("id" = i64, Path, description = "课时ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取课时成功", body = LessonResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "课时不存在")
    )
)]
pub async fn get_lesson(
    lesson_service: web::Data<LessonService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match lesson_service.get_lesson(user_id, path.into_inner()).await {
        Ok(lesson) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "lesson": lesson
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/lessons/{id}",
    tag = "lesson",
    params(
        ("id" = i64, Path, description = "课时ID")
    ),
    request_body = UpdateLessonRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新课时成功", body = LessonResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "没有修改权限"),
        (status = 404, description = "课时不存在")
    )
)]
pub async fn update_lesson(
    lesson_service: web::Data<LessonService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateLessonRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match lesson_service
        .update_lesson(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(lesson) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "lesson": lesson
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/lessons/{id}",
    tag = "lesson",
    params(
        ("id" = i64, Path, description = "课时ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除课时成功"),
        (status = 403, description = "只有所有者或管理员可以删除"),
        (status = 404, description = "课时不存在")
    )
)]
pub async fn delete_lesson(
    lesson_service: web::Data<LessonService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match lesson_service
        .delete_lesson(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Lesson deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn lesson_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lessons")
            .route("", web::get().to(list_lessons))
            .route("", web::post().to(create_lesson))
            .route("/{id}", web::get().to(get_lesson))
            .route("/{id}", web::put().to(update_lesson))
            .route("/{id}", web::delete().to(delete_lesson)),
    );
}
