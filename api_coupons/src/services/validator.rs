use std::fmt;

use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use db::models::coupon::Coupon;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    dtos::coupon::{CouponSummary, ValidateCouponRequest, ValidateCouponResponse},
    services::{
        discount::{self, DiscountType},
        store::CouponStore,
    },
};

/// Audience a coupon is targeted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerType {
    All,
    New,
    Returning,
}

impl CustomerType {
    fn parse(raw: &str) -> Res<Self> {
        match raw {
            "all" => Ok(CustomerType::All),
            "new" => Ok(CustomerType::New),
            "returning" => Ok(CustomerType::Returning),
            other => Err(AppError::Internal(format!(
                "Unknown coupon customer type '{}'",
                other
            ))),
        }
    }
}

/// Why a coupon cannot be applied. Listed in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotFound,
    Inactive,
    Expired,
    NotYetActive,
    BelowMinimum(Decimal),
    NewCustomersOnly,
    ReturningCustomersOnly,
    FirstOrderOnly,
    UsageLimitReached,
    CustomerLimitReached,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotFound => f.write_str("Coupon not found"),
            Rejection::Inactive => f.write_str("Coupon is not active"),
            Rejection::Expired => f.write_str("Coupon has expired"),
            Rejection::NotYetActive => f.write_str("Coupon is not yet active"),
            Rejection::BelowMinimum(min) => {
                write!(f, "Minimum order value of {} required", min.normalize())
            }
            Rejection::NewCustomersOnly => {
                f.write_str("This coupon is only valid for new customers")
            }
            Rejection::ReturningCustomersOnly => {
                f.write_str("This coupon is only valid for returning customers")
            }
            Rejection::FirstOrderOnly => {
                f.write_str("This coupon is only valid on your first order")
            }
            Rejection::UsageLimitReached => f.write_str("Coupon usage limit exceeded"),
            Rejection::CustomerLimitReached => {
                f.write_str("You have already used this coupon the maximum number of times")
            }
        }
    }
}

/// Codes are matched case-insensitively on their trimmed upper-case form.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Blank emails count as absent.
pub fn normalize_email(email: Option<&str>) -> Option<String> {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase)
}

/// Runs the rule chain for a candidate coupon and computes the discount.
///
/// Never writes. Business rejections come back as `valid: false`; only
/// storage failures and corrupt coupon rows are errors.
pub async fn validate_coupon<S: CouponStore>(
    store: &S,
    req: &ValidateCouponRequest,
    now: DateTime<Utc>,
) -> Res<ValidateCouponResponse> {
    let customer = Customer {
        store_id: req.store_id,
        phone: req.customer_phone.trim().to_string(),
        email: normalize_email(req.customer_email.as_deref()),
    };
    let code = normalize_code(&req.coupon_code);

    let coupon = match check_rules(store, &code, req.cart_total, &customer, now).await? {
        Ok(coupon) => coupon,
        Err(rejection) => {
            log::debug!(
                "Coupon {} rejected for store {}: {}",
                code,
                req.store_id,
                rejection
            );
            return Ok(ValidateCouponResponse::rejected(
                req.cart_total,
                rejection.to_string(),
            ));
        }
    };

    let kind: DiscountType = coupon
        .discount_type
        .parse()
        .map_err(AppError::Internal)?;
    let applied = discount::compute_discount(
        kind,
        coupon.discount_value,
        coupon.max_discount,
        req.cart_total,
    );

    log::debug!(
        "Coupon {} accepted for store {}: discount {} of {}",
        coupon.code,
        req.store_id,
        applied.discount,
        req.cart_total
    );

    Ok(ValidateCouponResponse {
        valid: true,
        discount: applied.discount,
        final_total: applied.final_total,
        coupon: Some(CouponSummary {
            id: coupon.id,
            code: coupon.code,
            discount_type: kind.to_string(),
            discount_value: coupon.discount_value,
        }),
        error: None,
    })
}

struct Customer {
    store_id: Uuid,
    phone: String,
    email: Option<String>,
}

/// The first failing rule wins, so customers see the most fundamental
/// reason first.
async fn check_rules<S: CouponStore>(
    store: &S,
    code: &str,
    cart_total: Decimal,
    customer: &Customer,
    now: DateTime<Utc>,
) -> Res<Result<Coupon, Rejection>> {
    let Some(coupon) = store.find_coupon(customer.store_id, code).await? else {
        return Ok(Err(Rejection::NotFound));
    };

    if !coupon.status.eq_ignore_ascii_case("active") {
        return Ok(Err(Rejection::Inactive));
    }
    if coupon.expiry_date.is_some_and(|expiry| now > expiry) {
        return Ok(Err(Rejection::Expired));
    }
    if coupon.start_date.is_some_and(|start| now < start) {
        return Ok(Err(Rejection::NotYetActive));
    }
    if let Some(min) = coupon.min_order_value {
        if cart_total < min {
            return Ok(Err(Rejection::BelowMinimum(min)));
        }
    }

    let customer_type = CustomerType::parse(&coupon.customer_type)?;
    if customer_type != CustomerType::All || coupon.first_order_only {
        let prior_orders = store
            .count_customer_orders(customer.store_id, &customer.phone, customer.email.as_deref())
            .await?;
        let is_new = prior_orders == 0;

        match customer_type {
            CustomerType::New if !is_new => return Ok(Err(Rejection::NewCustomersOnly)),
            CustomerType::Returning if is_new => {
                return Ok(Err(Rejection::ReturningCustomersOnly));
            }
            _ => {}
        }
        if coupon.first_order_only && !is_new {
            return Ok(Err(Rejection::FirstOrderOnly));
        }
    }

    if let Some(limit) = coupon.usage_limit_total {
        let used = store.count_redemptions(coupon.id).await?;
        if used >= i64::from(limit) {
            return Ok(Err(Rejection::UsageLimitReached));
        }
    }

    if let Some(limit) = coupon.usage_limit_per_customer {
        let used = customer_redemptions(store, coupon.id, customer).await?;
        if used >= i64::from(limit) {
            return Ok(Err(Rejection::CustomerLimitReached));
        }
    }

    Ok(Ok(coupon))
}

/// Phone is the primary identity; email is consulted only when the phone
/// has no redemptions, so one customer is never counted twice.
async fn customer_redemptions<S: CouponStore>(
    store: &S,
    coupon_id: Uuid,
    customer: &Customer,
) -> Res<i64> {
    let by_phone = store
        .count_redemptions_by_phone(coupon_id, &customer.phone)
        .await?;
    if by_phone > 0 {
        return Ok(by_phone);
    }
    match &customer.email {
        Some(email) => store.count_redemptions_by_email(coupon_id, email).await,
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_trimmed_and_upper_cased() {
        assert_eq!(normalize_code("  save10 "), "SAVE10");
        assert_eq!(normalize_code("Flat1000"), "FLAT1000");
    }

    #[test]
    fn blank_email_is_absent() {
        assert_eq!(normalize_email(Some("   ")), None);
        assert_eq!(normalize_email(None), None);
        assert_eq!(
            normalize_email(Some(" Asha@Example.com ")).as_deref(),
            Some("asha@example.com")
        );
    }

    #[test]
    fn minimum_message_drops_trailing_zeros() {
        let min: Decimal = "500.00".parse().unwrap();
        assert_eq!(
            Rejection::BelowMinimum(min).to_string(),
            "Minimum order value of 500 required"
        );
    }
}
