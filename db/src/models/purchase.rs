use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A paid marketplace add-on bought by a store. Carries the monthly quota.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MarketplacePurchase {
    pub id: Uuid,
    pub store_id: Uuid,
    pub feature_slug: String,
    pub status: String,
    pub quota_limit: i32,
    pub calls_used: i32,
    pub last_reset: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewsCache {
    pub store_id: Uuid,
    pub place_id: String,
    pub payload: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
}
