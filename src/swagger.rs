use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::user::get_me,
        handlers::user::update_me,
        handlers::user::get_user,
        handlers::user::list_users,
        handlers::course::list_courses,
        handlers::course::create_course,
        handlers::course::get_course,
        handlers::course::update_course,
        handlers::course::delete_course,
        handlers::course::subscribe,
        handlers::course::unsubscribe,
        handlers::course::checkout_course,
        handlers::lesson::list_lessons,
        handlers::lesson::create_lesson,
        handlers::lesson::get_lesson,
        handlers::lesson::update_lesson,
        handlers::lesson::delete_lesson,
        handlers::payment::list_payments,
        handlers::payment::create_payment,
        handlers::payment::get_payment,
        handlers::payment::update_payment,
        handlers::payment::delete_payment,
        handlers::subscription::list_subscriptions,
        handlers::admin::sweep_payments,
        handlers::admin::cleanup_payments,
        handlers::admin::deactivate_users,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            UserResponse,
            PublicUserResponse,
            AuthResponse,
            CreateCourseRequest,
            UpdateCourseRequest,
            CourseResponse,
            CourseDetailResponse,
            CreateLessonRequest,
            UpdateLessonRequest,
            LessonResponse,
            SubscriptionResponse,
            SubscribeResponse,
            CreatePaymentRequest,
            UpdatePaymentRequest,
            PaymentResponse,
            CheckoutResponse,
            PaymentMethod,
            PaymentStatus,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "user", description = "User profile API"),
        (name = "course", description = "Course management API"),
        (name = "lesson", description = "Lesson management API"),
        (name = "subscription", description = "Course subscription API"),
        (name = "payment", description = "Payment API"),
        (name = "admin", description = "Administrative tasks API"),
    ),
    info(
        title = "EduFlow Backend API",
        version = "1.0.0",
        description = "EduFlow education platform REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
