use crate::models::*;
use crate::services::{CourseService, PaymentService, SubscriptionService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn get_user_id_from_request(req: &HttpRequest) -> Option<i64> {
    req.extensions().get::<i64>().copied()
}

#[utoipa::path(
    get,
    path = "/courses",
    tag = "course",
    params(
        ("page" = Option<i64>, Query, description = "页码"),
        ("page_size" = Option<i64>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取课程列表成功，普通用户只能看到自己的课程"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_courses(
    course_service: web::Data<CourseService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match course_service
        .list_courses(user_id, &query.into_inner())
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
    path = "/courses",
    tag = "course",
    request_body = CreateCourseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建课程成功", body = CourseResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "版主不能创建课程")
    )
)]
pub async fn create_course(
    course_service: web::Data<CourseService>,
    req: HttpRequest,
    request: web::Json<CreateCourseRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match course_service
        .create_course(user_id, request.into_inner())
        .await
    {
        Ok(course) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "course": course
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/courses/{id}",
    tag = "course",
    params(
        ("id" = i64, Path, description = "课程ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取课程详情成功", body = CourseDetailResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "课程不存在")
    )
)]
pub async fn get_course(
    course_service: web::Data<CourseService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match course_service.get_course(user_id, path.into_inner()).await {
        Ok(course) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "course": course
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/courses/{id}",
    tag = "course",
    params(
        ("id" = i64, Path, description = "课程ID")
    ),
    request_body = UpdateCourseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新课程成功", body = CourseResponse),
        (status = 403, description = "没有修改权限"),
        (status = 404, description = "课程不存在")
    )
)]
pub async fn update_course(
    course_service: web::Data<CourseService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateCourseRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match course_service
        .update_course(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(course) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "course": course
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/courses/{id}",
    tag = "course",
    params(
        ("id" = i64, Path, description = "课程ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除课程成功"),
        (status = 403, description = "只有所有者或管理员可以删除"),
        (status = 404, description = "课程不存在")
    )
)]
pub async fn delete_course(
    course_service: web::Data<CourseService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match course_service
        .delete_course(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Course deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/courses/{id}/subscribe",
    tag = "subscription",
    params(
        ("id" = i64, Path, description = "课程ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订阅成功，重复订阅返回已有记录", body = SubscribeResponse),
        (status = 404, description = "课程不存在")
    )
)]
pub async fn subscribe(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match subscription_service
        .subscribe(user_id, path.into_inner())
        .await
    {
        Ok(response) => {
            let message = if response.created {
                "Subscribed"
            } else {
                "Already subscribed"
            };
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": response,
                "message": message
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/courses/{id}/subscribe",
    tag = "subscription",
    params(
        ("id" = i64, Path, description = "课程ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "退订成功"),
        (status = 404, description = "订阅记录不存在")
    )
)]
pub async fn unsubscribe(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match subscription_service
        .unsubscribe(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Unsubscribed"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/courses/{id}/checkout",
    tag = "payment",
    params(
        ("id" = i64, Path, description = "课程ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建结账会话成功", body = CheckoutResponse),
        (status = 404, description = "课程不存在"),
        (status = 502, description = "Stripe 调用失败")
    )
)]
pub async fn checkout_course(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match payment_service
        .checkout_course(user_id, path.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn course_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/courses")
            .route("", web::get().to(list_courses))
            .route("", web::post().to(create_course))
            .route("/{id}", web::get().to(get_course))
            .route("/{id}", web::put().to(update_course))
            .route("/{id}", web::delete().to(delete_course))
            .route("/{id}/subscribe", web::post().to(subscribe))
            .route("/{id}/subscribe", web::delete().to(unsubscribe))
            .route("/{id}/checkout", web::post().to(checkout_course)),
    );
}
