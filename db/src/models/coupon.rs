use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Coupon {
    pub id: Uuid,
    pub store_id: Uuid,
    pub code: String,
    /// `percentage` or `fixed`
    pub discount_type: String,
    pub discount_value: Decimal,
    /// Only honoured for percentage coupons.
    pub max_discount: Option<Decimal>,
    pub min_order_value: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    /// `all`, `new` or `returning`
    pub customer_type: String,
    pub first_order_only: bool,
    /// NULL means unlimited.
    pub usage_limit_total: Option<i32>,
    /// NULL means unlimited.
    pub usage_limit_per_customer: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the redemption ledger. Rows are only ever inserted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CouponUsage {
    pub id: Uuid,
    pub coupon_id: Uuid,
    pub order_id: Uuid,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub discount_applied: Decimal,
    pub used_at: DateTime<Utc>,
}
