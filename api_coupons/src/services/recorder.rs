use common::error::Res;
use db::dtos::usage::UsageCreateRequest;

use crate::{
    dtos::coupon::{RecordCouponUsageRequest, RecordCouponUsageResponse},
    services::{
        store::CouponStore,
        validator::{self, Rejection},
    },
};

/// Appends one ledger row for a placed order.
///
/// Only the coupon's existence is checked here; the caller validated the
/// coupon before the order was placed. A failed insert is an error because
/// the order would otherwise have no audit trail.
pub async fn record_coupon_usage<S: CouponStore>(
    store: &S,
    req: RecordCouponUsageRequest,
) -> Res<RecordCouponUsageResponse> {
    let code = validator::normalize_code(&req.coupon_code);

    let Some(coupon) = store.find_coupon(req.store_id, &code).await? else {
        log::warn!(
            "Usage for unknown coupon {} in store {} (order {})",
            code,
            req.store_id,
            req.order_id
        );
        return Ok(RecordCouponUsageResponse {
            success: false,
            message: None,
            error: Some(Rejection::NotFound.to_string()),
        });
    };

    let inserted = store
        .insert_redemption(UsageCreateRequest {
            coupon_id: coupon.id,
            order_id: req.order_id,
            customer_phone: req.customer_phone.trim().to_string(),
            customer_email: validator::normalize_email(req.customer_email.as_deref()),
            discount_applied: req.discount_applied,
        })
        .await?;

    if !inserted {
        log::info!(
            "Coupon {} already recorded for order {}",
            coupon.code,
            req.order_id
        );
        return Ok(RecordCouponUsageResponse {
            success: true,
            message: Some("Coupon usage already recorded".to_string()),
            error: None,
        });
    }

    log::info!(
        "Recorded coupon {} for order {} (discount {})",
        coupon.code,
        req.order_id,
        req.discount_applied
    );
    Ok(RecordCouponUsageResponse {
        success: true,
        message: Some("Coupon usage recorded".to_string()),
        error: None,
    })
}
