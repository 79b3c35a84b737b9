use crate::entities::{
    course_entity as courses, lesson_entity as lessons, payment_entity as payments,
};
use crate::error::{AppError, AppResult};
use crate::external::StripeService;
use crate::models::*;
use crate::permissions::{Action, check_payment, load_actor, payment_scope};
use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// 课程结账的默认价格（分），课程本身没有价格字段
const DEFAULT_COURSE_PRICE: i64 = 10000;

#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
    stripe_service: StripeService,
}

impl PaymentService {
    pub fn new(pool: DatabaseConnection, stripe_service: StripeService) -> Self {
        Self {
            pool,
            stripe_service,
        }
    }

    /// 付款列表：普通用户只看自己的，版主与管理员看全部
    pub async fn list_payments(
        &self,
        user_id: i64,
        query: &PaymentQuery,
    ) -> AppResult<PaginatedResponse<PaymentResponse>> {
        let actor = load_actor(&self.pool, user_id).await?;
        let params = PaginationParams::new(query.page, query.page_size);

        let mut find = payments::Entity::find();
        if let Some(owner_id) = payment_scope(&actor) {
            find = find.filter(payments::Column::UserId.eq(owner_id));
        }
        if let Some(course_id) = query.course {
            find = find.filter(payments::Column::PaidCourseId.eq(course_id));
        }
        if let Some(lesson_id) = query.lesson {
            find = find.filter(payments::Column::PaidLessonId.eq(lesson_id));
        }
        if let Some(method) = &query.payment_method {
            find = find.filter(payments::Column::PaymentMethod.eq(method.clone()));
        }
        if let Some(after) = query.payment_date_after {
            find = find.filter(payments::Column::PaymentDate.gte(after));
        }
        if let Some(before) = query.payment_date_before {
            find = find.filter(payments::Column::PaymentDate.lte(before));
        }

        let total = find.clone().count(&self.pool).await? as i64;

        let models = find
            .order_by_desc(payments::Column::PaymentDate)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let items: Vec<PaymentResponse> = models.into_iter().map(PaymentResponse::from).collect();

        Ok(PaginatedResponse::from_params(items, &params, total))
    }

    pub async fn get_payment(&self, user_id: i64, payment_id: i64) -> AppResult<PaymentResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        let payment = self.find_payment(payment_id).await?;
        check_payment(&actor, Action::ReadDetail, Some(payment.user_id))?;

        Ok(PaymentResponse::from(payment))
    }

    /// 手工登记付款，仅管理员
    pub async fn create_payment(
        &self,
        user_id: i64,
        request: CreatePaymentRequest,
    ) -> AppResult<PaymentResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        check_payment(&actor, Action::Create, None)?;

        validate_payment_target(request.paid_course, request.paid_lesson)?;
        if request.amount <= 0 {
            return Err(AppError::ValidationError(
                "Payment amount must be positive".to_string(),
            ));
        }

        // 付款目标必须存在
        if let Some(course_id) = request.paid_course {
            courses::Entity::find_by_id(course_id)
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
        }
        if let Some(lesson_id) = request.paid_lesson {
            lessons::Entity::find_by_id(lesson_id)
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;
        }

        let now = Utc::now();
        let payment = payments::ActiveModel {
            user_id: Set(request.user),
            paid_course_id: Set(request.paid_course),
            paid_lesson_id: Set(request.paid_lesson),
            amount: Set(request.amount),
            payment_method: Set(request.payment_method),
            payment_status: Set(PaymentStatus::Pending),
            payment_date: Set(now),
            stripe_session_id: Set(None),
            stripe_payment_url: Set(None),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(PaymentResponse::from(payment))
    }

    /// 修改付款记录，仅管理员
    pub async fn update_payment(
        &self,
        user_id: i64,
        payment_id: i64,
        request: UpdatePaymentRequest,
    ) -> AppResult<PaymentResponse> {
        let actor = load_actor(&self.pool, user_id).await?;
        let payment = self.find_payment(payment_id).await?;
        check_payment(&actor, Action::Update, Some(payment.user_id))?;

        if let Some(amount) = request.amount
            && amount <= 0
        {
            return Err(AppError::ValidationError(
                "Payment amount must be positive".to_string(),
            ));
        }

        let mut model = payment.into_active_model();
        if let Some(amount) = request.amount {
            model.amount = Set(amount);
        }
        if let Some(method) = request.payment_method {
            model.payment_method = Set(method);
        }
        if let Some(status) = request.payment_status {
            model.payment_status = Set(status);
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(PaymentResponse::from(updated))
    }

    /// 删除付款记录，仅管理员
    pub async fn delete_payment(&self, user_id: i64, payment_id: i64) -> AppResult<()> {
        let actor = load_actor(&self.pool, user_id).await?;
        let payment = self.find_payment(payment_id).await?;
        check_payment(&actor, Action::Delete, Some(payment.user_id))?;

        payment.delete(&self.pool).await?;
        Ok(())
    }

    /// 为课程创建 Stripe 结账会话并登记一笔待支付的付款
    pub async fn checkout_course(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> AppResult<CheckoutResponse> {
        let actor = load_actor(&self.pool, user_id).await?;

        let course = courses::Entity::find_by_id(course_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
        crate::permissions::check_content(&actor, Action::ReadDetail, course.owner_id, "Course")?;

        let description = course
            .description
            .clone()
            .unwrap_or_else(|| "Course payment".to_string());
        let product = self
            .stripe_service
            .create_product(&course.title, &description)
            .await?;
        let price = self
            .stripe_service
            .create_price(&product.id, DEFAULT_COURSE_PRICE)
            .await?;
        let session = self
            .stripe_service
            .create_checkout_session(
                &price.id,
                &[
                    ("course_id", course.id.to_string()),
                    ("user_id", actor.id.to_string()),
                    ("type", "course".to_string()),
                ],
            )
            .await?;

        let payment_url = session.url.clone().unwrap_or_default();
        let now = Utc::now();
        let payment = payments::ActiveModel {
            user_id: Set(actor.id),
            paid_course_id: Set(Some(course.id)),
            paid_lesson_id: Set(None),
            amount: Set(DEFAULT_COURSE_PRICE),
            payment_method: Set(PaymentMethod::Stripe),
            payment_status: Set(PaymentStatus::Pending),
            payment_date: Set(now),
            stripe_session_id: Set(Some(session.id.clone())),
            stripe_payment_url: Set(Some(payment_url.clone())),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(CheckoutResponse {
            payment: PaymentResponse::from(payment),
            session_id: session.id,
            payment_url,
        })
    }

    /// 管理端手动触发超时付款清理
    pub async fn run_sweep(&self, user_id: i64) -> AppResult<u64> {
        let actor = load_actor(&self.pool, user_id).await?;
        if !actor.is_admin() {
            return Err(AppError::Forbidden);
        }
        self.sweep_stale_payments().await
    }

    /// 管理端手动触发历史数据清理
    pub async fn run_cleanup(&self, user_id: i64) -> AppResult<u64> {
        let actor = load_actor(&self.pool, user_id).await?;
        if !actor.is_admin() {
            return Err(AppError::Forbidden);
        }
        self.cleanup_old_payments().await
    }

    /// 把超过 24 小时仍处于 pending 的付款置为 failed
    pub async fn sweep_stale_payments(&self) -> AppResult<u64> {
        let cutoff = stale_payment_cutoff(Utc::now());

        let result = payments::Entity::update_many()
            .col_expr(
                payments::Column::PaymentStatus,
                Expr::value(PaymentStatus::Failed),
            )
            .col_expr(payments::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(payments::Column::PaymentStatus.eq(PaymentStatus::Pending))
            .filter(payments::Column::PaymentDate.lt(cutoff))
            .exec(&self.pool)
            .await?;

        Ok(result.rows_affected)
    }

    /// 删除一年前的 failed 付款记录
    pub async fn cleanup_old_payments(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(365);

        let result = payments::Entity::delete_many()
            .filter(payments::Column::PaymentStatus.eq(PaymentStatus::Failed))
            .filter(payments::Column::PaymentDate.lt(cutoff))
            .exec(&self.pool)
            .await?;

        Ok(result.rows_affected)
    }

    async fn find_payment(&self, payment_id: i64) -> AppResult<payments::Model> {
        payments::Entity::find_by_id(payment_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
    }
}

/// 付款必须且只能关联课程或课时之一
fn validate_payment_target(paid_course: Option<i64>, paid_lesson: Option<i64>) -> AppResult<()> {
    match (paid_course, paid_lesson) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        (Some(_), Some(_)) => Err(AppError::ValidationError(
            "Payment must reference either a course or a lesson, not both".to_string(),
        )),
        (None, None) => Err(AppError::ValidationError(
            "Payment must reference a course or a lesson".to_string(),
        )),
    }
}

/// pending 付款的超时阈值：24 小时
fn stale_payment_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_payment_target() {
        assert!(validate_payment_target(Some(1), None).is_ok());
        assert!(validate_payment_target(None, Some(1)).is_ok());
        assert!(validate_payment_target(Some(1), Some(2)).is_err());
        assert!(validate_payment_target(None, None).is_err());
    }

    #[test]
    fn test_stale_payment_cutoff() {
        let now = Utc::now();
        let cutoff = stale_payment_cutoff(now);
        assert_eq!(now - cutoff, Duration::hours(24));

        // 23 小时前的付款不应命中 payment_date < cutoff
        let fresh = now - Duration::hours(23);
        assert!(fresh > cutoff);
        let stale = now - Duration::hours(25);
        assert!(stale < cutoff);
    }
}
