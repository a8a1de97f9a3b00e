use rust_decimal::Decimal;
use uuid::Uuid;

pub struct UsageCreateRequest {
    pub coupon_id: Uuid,
    pub order_id: Uuid,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub discount_applied: Decimal,
}
