use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    /// `trial`, `active`, `expired` or `cancelled`
    pub status: String,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub whatsapp_orders_used: i32,
    pub website_orders_used: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-tier limits. Product limit: NULL is unlimited. Order limits: NULL
/// disables the channel and 0 is unlimited.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SubscriptionPlan {
    pub id: Uuid,
    pub name: String,
    pub max_products: Option<i32>,
    pub whatsapp_orders_limit: Option<i32>,
    pub website_orders_limit: Option<i32>,
    pub enable_analytics: bool,
    pub enable_location_sharing: bool,
    pub trial_days: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderChannel {
    Whatsapp,
    Website,
}

impl OrderChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderChannel::Whatsapp => "whatsapp",
            OrderChannel::Website => "website",
        }
    }
}
