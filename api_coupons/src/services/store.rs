use common::error::Res;
use db::{dtos::usage::UsageCreateRequest, models::coupon::Coupon};
use sqlx::PgPool;
use uuid::Uuid;

/// Reads and writes the coupon engine needs. Implemented for the Postgres
/// pool; anything else (an in-memory store in tests) can stand in.
#[allow(async_fn_in_trait)]
pub trait CouponStore {
    /// `code` is already normalized to upper case.
    async fn find_coupon(&self, store_id: Uuid, code: &str) -> Res<Option<Coupon>>;

    /// Orders the customer placed in this store, matched by phone or email.
    async fn count_customer_orders(
        &self,
        store_id: Uuid,
        phone: &str,
        email: Option<&str>,
    ) -> Res<i64>;

    async fn count_redemptions(&self, coupon_id: Uuid) -> Res<i64>;

    async fn count_redemptions_by_phone(&self, coupon_id: Uuid, phone: &str) -> Res<i64>;

    async fn count_redemptions_by_email(&self, coupon_id: Uuid, email: &str) -> Res<i64>;

    /// Returns `false` when the order was already recorded for this coupon.
    async fn insert_redemption(&self, usage: UsageCreateRequest) -> Res<bool>;
}

impl CouponStore for PgPool {
    async fn find_coupon(&self, store_id: Uuid, code: &str) -> Res<Option<Coupon>> {
        db::coupon::get_coupon_by_code(self, store_id, code).await
    }

    async fn count_customer_orders(
        &self,
        store_id: Uuid,
        phone: &str,
        email: Option<&str>,
    ) -> Res<i64> {
        db::order::count_orders_by_customer(self, store_id, phone, email).await
    }

    async fn count_redemptions(&self, coupon_id: Uuid) -> Res<i64> {
        db::usage::count_usage_by_coupon(self, coupon_id).await
    }

    async fn count_redemptions_by_phone(&self, coupon_id: Uuid, phone: &str) -> Res<i64> {
        db::usage::count_usage_by_phone(self, coupon_id, phone).await
    }

    async fn count_redemptions_by_email(&self, coupon_id: Uuid, email: &str) -> Res<i64> {
        db::usage::count_usage_by_email(self, coupon_id, email).await
    }

    async fn insert_redemption(&self, usage: UsageCreateRequest) -> Res<bool> {
        db::usage::insert_usage(self, usage).await
    }
}
