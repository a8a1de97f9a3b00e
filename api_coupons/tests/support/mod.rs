#![allow(dead_code)]

use std::sync::Mutex;

use api_coupons::services::store::CouponStore;
use chrono::{DateTime, Duration, Utc};
use common::error::Res;
use db::{
    dtos::usage::UsageCreateRequest,
    models::coupon::{Coupon, CouponUsage},
};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

pub fn coupon(store_id: Uuid, code: &str, discount_type: &str, value: &str) -> Coupon {
    let now = Utc::now();
    Coupon {
        id: Uuid::new_v4(),
        store_id,
        code: code.to_string(),
        discount_type: discount_type.to_string(),
        discount_value: dec(value),
        max_discount: None,
        min_order_value: None,
        start_date: Some(now - Duration::days(30)),
        expiry_date: Some(now + Duration::days(30)),
        customer_type: "all".to_string(),
        first_order_only: false,
        usage_limit_total: None,
        usage_limit_per_customer: None,
        status: "active".to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub struct PastOrder {
    pub store_id: Uuid,
    pub phone: String,
    pub email: Option<String>,
}

/// In-memory stand-in for the Postgres tables the engine touches.
#[derive(Default)]
pub struct MemoryStore {
    pub coupons: Vec<Coupon>,
    pub orders: Vec<PastOrder>,
    pub ledger: Mutex<Vec<CouponUsage>>,
    pub fail_inserts: bool,
}

impl MemoryStore {
    pub fn with_coupon(coupon: Coupon) -> Self {
        Self {
            coupons: vec![coupon],
            ..Default::default()
        }
    }

    pub fn add_order(&mut self, store_id: Uuid, phone: &str, email: Option<&str>) {
        self.orders.push(PastOrder {
            store_id,
            phone: phone.to_string(),
            email: email.map(str::to_string),
        });
    }

    pub fn redeem(&self, coupon_id: Uuid, phone: &str, email: Option<&str>) {
        self.ledger.lock().unwrap().push(CouponUsage {
            id: Uuid::new_v4(),
            coupon_id,
            order_id: Uuid::new_v4(),
            customer_phone: phone.to_string(),
            customer_email: email.map(str::to_string),
            discount_applied: Decimal::ZERO,
            used_at: Utc::now(),
        });
    }

    pub fn ledger_len(&self) -> usize {
        self.ledger.lock().unwrap().len()
    }
}

impl CouponStore for MemoryStore {
    async fn find_coupon(&self, store_id: Uuid, code: &str) -> Res<Option<Coupon>> {
        Ok(self
            .coupons
            .iter()
            .find(|c| c.store_id == store_id && c.code.to_uppercase() == code)
            .cloned())
    }

    async fn count_customer_orders(
        &self,
        store_id: Uuid,
        phone: &str,
        email: Option<&str>,
    ) -> Res<i64> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.store_id == store_id)
            .filter(|o| {
                o.phone == phone
                    || matches!((email, o.email.as_deref()), (Some(a), Some(b)) if a.eq_ignore_ascii_case(b))
            })
            .count() as i64)
    }

    async fn count_redemptions(&self, coupon_id: Uuid) -> Res<i64> {
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.coupon_id == coupon_id)
            .count() as i64)
    }

    async fn count_redemptions_by_phone(&self, coupon_id: Uuid, phone: &str) -> Res<i64> {
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.coupon_id == coupon_id && u.customer_phone == phone)
            .count() as i64)
    }

    async fn count_redemptions_by_email(&self, coupon_id: Uuid, email: &str) -> Res<i64> {
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .iter()
            .filter(|u| {
                u.coupon_id == coupon_id
                    && u.customer_email
                        .as_deref()
                        .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .count() as i64)
    }

    async fn insert_redemption(&self, usage: UsageCreateRequest) -> Res<bool> {
        if self.fail_inserts {
            return Err(common::error::AppError::Internal(
                "ledger unavailable".to_string(),
            ));
        }
        let mut ledger = self.ledger.lock().unwrap();
        if ledger
            .iter()
            .any(|u| u.coupon_id == usage.coupon_id && u.order_id == usage.order_id)
        {
            return Ok(false);
        }
        ledger.push(CouponUsage {
            id: Uuid::new_v4(),
            coupon_id: usage.coupon_id,
            order_id: usage.order_id,
            customer_phone: usage.customer_phone,
            customer_email: usage.customer_email,
            discount_applied: usage.discount_applied,
            used_at: Utc::now(),
        });
        Ok(true)
    }
}

