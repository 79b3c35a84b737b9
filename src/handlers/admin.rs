use crate::services::{PaymentService, UserService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn get_user_id_from_request(req: &HttpRequest) -> Option<i64> {
    req.extensions().get::<i64>().copied()
}

#[utoipa::path(
    post,
    path = "/admin/tasks/sweep-payments",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "超时付款清理完成"),
        (status = 403, description = "仅管理员可以触发")
    )
)]
pub async fn sweep_payments(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match payment_service.run_sweep(user_id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "processed_count": count
            },
            "message": "Stale payments marked as failed"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/tasks/cleanup-payments",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "历史付款清理完成"),
        (status = 403, description = "仅管理员可以触发")
    )
)]
pub async fn cleanup_payments(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match payment_service.run_cleanup(user_id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "processed_count": count
            },
            "message": "Old failed payments removed"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/tasks/deactivate-users",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "闲置用户停用完成"),
        (status = 403, description = "仅管理员可以触发")
    )
)]
pub async fn deactivate_users(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match user_service.run_deactivation(user_id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "processed_count": count
            },
            "message": "Inactive users deactivated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/tasks/sweep-payments", web::post().to(sweep_payments))
            .route("/tasks/cleanup-payments", web::post().to(cleanup_payments))
            .route("/tasks/deactivate-users", web::post().to(deactivate_users)),
    );
}
