use crate::entities::payment_entity as payments;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    #[serde(rename = "cash")]
    Cash,
    #[sea_orm(string_value = "transfer")]
    #[serde(rename = "transfer")]
    Transfer,
    #[sea_orm(string_value = "stripe")]
    #[serde(rename = "stripe")]
    Stripe,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Transfer => write!(f, "transfer"),
            PaymentMethod::Stripe => write!(f, "stripe"),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    #[serde(rename = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    #[serde(rename = "paid")]
    Paid,
    #[sea_orm(string_value = "failed")]
    #[serde(rename = "failed")]
    Failed,
    #[sea_orm(string_value = "refunded")]
    #[serde(rename = "refunded")]
    Refunded,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub user: i64,
    pub paid_course: Option<i64>,
    pub paid_lesson: Option<i64>,
    /// 金额，单位为分
    #[schema(example = 10000)]
    pub amount: i64,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub amount: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i64,
    pub user: i64,
    pub paid_course: Option<i64>,
    pub paid_lesson: Option<i64>,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
    pub stripe_session_id: Option<String>,
    pub stripe_payment_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentQuery {
    pub course: Option<i64>,
    pub lesson: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_date_after: Option<DateTime<Utc>>,
    pub payment_date_before: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    pub payment: PaymentResponse,
    pub session_id: String,
    pub payment_url: String,
}

impl From<payments::Model> for PaymentResponse {
    fn from(payment: payments::Model) -> Self {
        Self {
            id: payment.id,
            user: payment.user_id,
            paid_course: payment.paid_course_id,
            paid_lesson: payment.paid_lesson_id,
            amount: payment.amount,
            payment_method: payment.payment_method,
            payment_status: payment.payment_status,
            payment_date: payment.payment_date,
            stripe_session_id: payment.stripe_session_id,
            stripe_payment_url: payment.stripe_payment_url,
        }
    }
}
