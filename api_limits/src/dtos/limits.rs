use db::models::subscription::OrderChannel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Consumption of one limited resource. `limit` is the raw plan value and
/// `remaining` is `None` when unlimited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageBlock {
    pub used: i64,
    pub limit: Option<i64>,
    pub remaining: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LimitsSnapshot {
    pub status: Option<String>,
    pub plan_id: Option<Uuid>,
    pub plan_name: Option<String>,
    pub can_publish_product: bool,
    pub can_place_whatsapp_order: bool,
    pub can_place_website_order: bool,
    pub can_use_analytics: bool,
    pub can_share_location: bool,
    pub products: UsageBlock,
    pub whatsapp_orders: UsageBlock,
    pub website_orders: UsageBlock,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLimitRequest {
    pub store_id: Uuid,
    pub channel: OrderChannel,
}

#[derive(Debug, Serialize)]
pub struct OrderLimitCheckResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderRecordResponse {
    pub success: bool,
    pub used: i32,
}

#[derive(Debug, Serialize)]
pub struct ResetUsageResponse {
    pub subscription_id: Uuid,
    pub whatsapp_orders_used: i32,
    pub website_orders_used: i32,
}
