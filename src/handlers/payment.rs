use crate::models::*;
use crate::services::PaymentService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn get_user_id_from_request(req: &HttpRequest) -> Option<i64> {
    req.extensions().get::<i64>().copied()
}

#[utoipa::path(
    get,
    path = "/payments",
    tag = "payment",
    params(
        ("course" = Option<i64>, Query, description = "按课程筛选"),
        ("lesson" = Option<i64>, Query, description = "按课时筛选"),
        ("payment_method" = Option<PaymentMethod>, Query, description = "按支付方式筛选"),
        ("payment_date_after" = Option<String>, Query, description = "支付日期下限 (RFC3339)"),
        ("payment_date_before" = Option<String>, Query, description = "支付日期上限 (RFC3339)"),
        ("page" = Option<i64>, Query, description = "页码"),
        ("page_size" = Option<i64>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取付款列表成功，普通用户只能看到自己的付款"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_payments(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    query: web::Query<PaymentQuery>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match payment_service
        .list_payments(user_id, &query.into_inner())
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
    path = "/payments",
    tag = "payment",
    request_body = CreatePaymentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "登记付款成功", body = PaymentResponse),
        (status = 400, description = "请求参数错误，例如课程与课时同时指定"),
        (status = 403, description = "仅管理员可以登记付款")
    )
)]
pub async fn create_payment(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    request: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match payment_service
        .create_payment(user_id, request.into_inner())
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "payment": payment
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "payment",
    params(
        ("id" = i64, Path, description = "付款ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取付款成功", body = PaymentResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "付款不存在")
    )
)]
pub async fn get_payment(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match payment_service.get_payment(user_id, path.into_inner()).await {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "payment": payment
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/payments/{id}",
    tag = "payment",
    params(
        ("id" = i64, Path, description = "付款ID")
    ),
    request_body = UpdatePaymentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新付款成功", body = PaymentResponse),
        (status = 403, description = "仅管理员可以修改付款"),
        (status = 404, description = "付款不存在")
    )
)]
pub async fn update_payment(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdatePaymentRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match payment_service
        .update_payment(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "payment": payment
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/payments/{id}",
    tag = "payment",
    params(
        ("id" = i64, Path, description = "付款ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除付款成功"),
        (status = 403, description = "仅管理员可以删除付款"),
        (status = 404, description = "付款不存在")
    )
)]
pub async fn delete_payment(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match payment_service
        .delete_payment(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Payment deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(list_payments))
            .route("", web::post().to(create_payment))
            .route("/{id}", web::get().to(get_payment))
            .route("/{id}", web::put().to(update_payment))
            .route("/{id}", web::delete().to(delete_payment)),
    );
}
