use std::sync::Arc;

use actix_web::{HttpResponse, post, web};
use chrono::Utc;
use common::{error::Res, http::Success};
use sqlx::PgPool;

use crate::{
    dtos::coupon::{RecordCouponUsageRequest, ValidateCouponRequest},
    services,
};

/// Checks a coupon code against a cart at checkout.
///
/// # Input
/// - `couponCode`, `storeId`, `cartTotal`, `customerPhone`, optional `customerEmail`
///
/// # Output
/// - 200 with `{valid, discount, finalTotal, coupon?, error?}`; a rejected
///   coupon is still a 200 with `valid: false` and the reason in `error`
/// - 400 on malformed input, 401 without a token, 500 on storage failure
#[post("/validate-coupon")]
pub async fn post_validate_coupon(
    pool: web::Data<Arc<PgPool>>,
    req: web::Json<ValidateCouponRequest>,
) -> Res<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let pool: &PgPool = pool.get_ref();
    let outcome = services::validator::validate_coupon(pool, &req, Utc::now()).await?;
    Success::ok(outcome)
}

/// Writes the redemption ledger entry once the order has been placed.
///
/// # Output
/// - 200 with `{success, message?, error?}`
/// - 400 on malformed input, 401 without a token, 500 when the insert fails
#[post("/record-coupon-usage")]
pub async fn post_record_coupon_usage(
    pool: web::Data<Arc<PgPool>>,
    req: web::Json<RecordCouponUsageRequest>,
) -> Res<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let pool: &PgPool = pool.get_ref();
    let outcome = services::recorder::record_coupon_usage(pool, req).await?;
    Success::ok(outcome)
}
