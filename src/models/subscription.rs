use crate::entities::subscription_entity as subscriptions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub course: i64,
    pub created_at: Option<DateTime<Utc>>,
}

/// 订阅操作结果，created 用于区分新建与重复订阅
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscribeResponse {
    pub subscription: SubscriptionResponse,
    pub created: bool,
}

impl From<subscriptions::Model> for SubscriptionResponse {
    fn from(subscription: subscriptions::Model) -> Self {
        Self {
            id: subscription.id,
            course: subscription.course_id,
            created_at: subscription.created_at,
        }
    }
}
