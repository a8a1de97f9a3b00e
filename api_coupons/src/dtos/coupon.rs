use common::error::{AppError, Res};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    pub coupon_code: String,
    pub store_id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub cart_total: Decimal,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
}

impl ValidateCouponRequest {
    pub fn validate(&self) -> Res<()> {
        require_code(&self.coupon_code)?;
        require_phone(&self.customer_phone)?;
        if self.cart_total < Decimal::ZERO {
            return Err(AppError::BadRequest(
                "cartTotal must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponResponse {
    pub valid: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<CouponSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidateCouponResponse {
    /// A rejection leaves the cart untouched.
    pub fn rejected(cart_total: Decimal, reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            discount: Decimal::ZERO,
            final_total: cart_total,
            coupon: None,
            error: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouponSummary {
    pub id: Uuid,
    pub code: String,
    pub discount_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCouponUsageRequest {
    pub coupon_code: String,
    pub store_id: Uuid,
    pub order_id: Uuid,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_applied: Decimal,
}

impl RecordCouponUsageRequest {
    pub fn validate(&self) -> Res<()> {
        require_code(&self.coupon_code)?;
        require_phone(&self.customer_phone)?;
        if self.discount_applied < Decimal::ZERO {
            return Err(AppError::BadRequest(
                "discountApplied must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordCouponUsageResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn require_code(code: &str) -> Res<()> {
    if code.trim().is_empty() {
        return Err(AppError::BadRequest("couponCode is required".to_string()));
    }
    Ok(())
}

fn require_phone(phone: &str) -> Res<()> {
    if phone.trim().is_empty() {
        return Err(AppError::BadRequest("customerPhone is required".to_string()));
    }
    Ok(())
}
