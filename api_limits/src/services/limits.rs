use common::{
    error::{AppError, Res},
    jwt::{JwtClaims, ROLE_SUPER_ADMIN},
};
use db::models::subscription::OrderChannel;
use limiter::plan::SubscriptionLimits;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::limits::{
    LimitsSnapshot, OrderLimitCheckResponse, OrderLimitRequest, OrderRecordResponse,
    ResetUsageResponse, UsageBlock,
};

/// Loads the user's current subscription, its plan and the live published
/// product count.
///
/// # Arguments
///
/// * `pool` - A reference to the database connection pool.
/// * `user_id` - The store owner whose limits are evaluated.
///
/// # Returns
///
/// A `Result` containing the `SubscriptionLimits` of the user or an `AppError` if a query fails.
pub async fn load_limits(pool: &PgPool, user_id: Uuid) -> Res<SubscriptionLimits> {
    let subscription = db::subscription::get_latest_subscription_by_user(pool, user_id).await?;
    let plan = match &subscription {
        Some(sub) => db::subscription::get_plan_by_id(pool, sub.plan_id).await?,
        None => None,
    };
    let published_products = db::store::count_published_products_by_user(pool, user_id).await?;

    Ok(SubscriptionLimits::new(
        subscription,
        plan,
        published_products,
    ))
}

pub async fn get_snapshot(pool: &PgPool, user_id: Uuid) -> Res<LimitsSnapshot> {
    let limits = load_limits(pool, user_id).await?;
    Ok(snapshot(&limits))
}

/// Dashboard view of a user's limits.
pub fn snapshot(limits: &SubscriptionLimits) -> LimitsSnapshot {
    let plan = limits.plan();
    let sub = limits.subscription();

    LimitsSnapshot {
        status: sub.map(|s| s.status.clone()),
        plan_id: plan.map(|p| p.id),
        plan_name: plan.map(|p| p.name.clone()),
        can_publish_product: limits.can_publish_product(),
        can_place_whatsapp_order: limits.can_place_whatsapp_order(),
        can_place_website_order: limits.can_place_website_order(),
        can_use_analytics: limits.can_use_analytics(),
        can_share_location: limits.can_share_location(),
        products: UsageBlock {
            used: limits.published_products(),
            limit: plan.and_then(|p| p.max_products).map(i64::from),
            remaining: limits.remaining_products(),
        },
        whatsapp_orders: UsageBlock {
            used: sub.map_or(0, |s| i64::from(s.whatsapp_orders_used)),
            limit: plan.and_then(|p| p.whatsapp_orders_limit).map(i64::from),
            remaining: limits.remaining_whatsapp_orders(),
        },
        website_orders: UsageBlock {
            used: sub.map_or(0, |s| i64::from(s.website_orders_used)),
            limit: plan.and_then(|p| p.website_orders_limit).map(i64::from),
            remaining: limits.remaining_website_orders(),
        },
        warnings: limits.warnings(),
    }
}

/// Whether the store can take one more order on `channel`. Never mutates.
pub async fn check_order_limit(
    pool: &PgPool,
    req: OrderLimitRequest,
) -> Res<OrderLimitCheckResponse> {
    let owner = store_owner(pool, req.store_id).await?;
    let limits = load_limits(pool, owner).await?;
    let verdict = order_verdict(&limits, req.channel);

    if !verdict.allowed {
        log::debug!(
            "Store {} blocked from taking a {} order",
            req.store_id,
            req.channel.as_str()
        );
    }
    Ok(verdict)
}

pub fn order_verdict(limits: &SubscriptionLimits, channel: OrderChannel) -> OrderLimitCheckResponse {
    if !limits.has_active_subscription() {
        return OrderLimitCheckResponse {
            allowed: false,
            message: Some("This store does not have an active subscription".to_string()),
        };
    }
    OrderLimitCheckResponse {
        allowed: limits.can_place_order(channel),
        message: limits.order_warning(channel),
    }
}

/// Counts one placed order against the owner's subscription.
pub async fn record_order(
    pool: &PgPool,
    claims: &JwtClaims,
    req: OrderLimitRequest,
) -> Res<OrderRecordResponse> {
    let user_id = claims.user_id()?;
    let owner = store_owner(pool, req.store_id).await?;
    ensure_owner(claims, user_id, owner)?;
    let subscription = db::subscription::get_latest_subscription_by_user(pool, owner)
        .await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

    let used = db::subscription::increment_order_counter(pool, subscription.id, req.channel)
        .await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

    log::info!(
        "Recorded {} order for store {} ({} used)",
        req.channel.as_str(),
        req.store_id,
        used
    );
    Ok(OrderRecordResponse {
        success: true,
        used,
    })
}

/// Zeroes both order counters on the user's current subscription.
pub async fn reset_usage(pool: &PgPool, user_id: Uuid) -> Res<ResetUsageResponse> {
    let subscription = db::subscription::get_latest_subscription_by_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

    let reset = db::subscription::reset_order_counters(pool, subscription.id).await?;
    log::info!("Reset order usage of subscription {}", reset.id);

    Ok(ResetUsageResponse {
        subscription_id: reset.id,
        whatsapp_orders_used: reset.whatsapp_orders_used,
        website_orders_used: reset.website_orders_used,
    })
}

/// Counters belong to the store's owner; platform admins may act for them.
fn ensure_owner(claims: &JwtClaims, user_id: Uuid, owner: Uuid) -> Res<()> {
    if owner != user_id && claims.role != ROLE_SUPER_ADMIN {
        return Err(AppError::Forbidden(
            "You do not have access to this store".to_string(),
        ));
    }
    Ok(())
}

async fn store_owner(pool: &PgPool, store_id: Uuid) -> Res<Uuid> {
    db::store::get_store_owner(pool, store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::jwt::ROLE_AUTHENTICATED;
    use db::models::subscription::{Subscription, SubscriptionPlan};

    use super::*;

    fn limits(status: &str, whatsapp: Option<i32>, used: i32) -> SubscriptionLimits {
        let plan = SubscriptionPlan {
            id: Uuid::new_v4(),
            name: "Starter".to_string(),
            max_products: Some(20),
            whatsapp_orders_limit: whatsapp,
            website_orders_limit: None,
            enable_analytics: false,
            enable_location_sharing: true,
            trial_days: 14,
        };
        let sub = Subscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: plan.id,
            status: status.to_string(),
            current_period_start: None,
            current_period_end: None,
            trial_ends_at: None,
            whatsapp_orders_used: used,
            website_orders_used: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        SubscriptionLimits::new(Some(sub), Some(plan), 18)
    }

    #[test]
    fn snapshot_reports_raw_limits_and_remaining() {
        let s = snapshot(&limits("active", Some(0), 120));
        assert_eq!(s.status.as_deref(), Some("active"));
        assert_eq!(
            s.products,
            UsageBlock {
                used: 18,
                limit: Some(20),
                remaining: Some(2),
            }
        );
        assert_eq!(s.whatsapp_orders.limit, Some(0));
        assert_eq!(s.whatsapp_orders.remaining, None);
        assert_eq!(s.website_orders.remaining, Some(0));
        assert!(s.can_place_whatsapp_order);
        assert!(!s.can_place_website_order);
        assert!(s.can_share_location);
        assert_eq!(
            s.warnings,
            vec![
                "You can publish 2 more products on your current plan.".to_string(),
                "Your current plan does not include website orders.".to_string(),
            ]
        );
    }

    #[test]
    fn snapshot_without_subscription() {
        let s = snapshot(&SubscriptionLimits::new(None, None, 4));
        assert_eq!(s.status, None);
        assert_eq!(s.products.used, 4);
        assert!(!s.can_publish_product);
        assert!(!s.can_use_analytics);
    }

    #[test]
    fn verdict_blocks_inactive_subscription() {
        let v = order_verdict(&limits("cancelled", Some(0), 0), OrderChannel::Whatsapp);
        assert!(!v.allowed);
        assert_eq!(
            v.message.as_deref(),
            Some("This store does not have an active subscription")
        );
    }

    #[test]
    fn verdict_carries_low_remaining_warning() {
        let v = order_verdict(&limits("trial", Some(50), 48), OrderChannel::Whatsapp);
        assert!(v.allowed);
        assert_eq!(
            v.message.as_deref(),
            Some("Only 2 WhatsApp orders left on your current plan.")
        );

        let v = order_verdict(&limits("active", Some(50), 50), OrderChannel::Whatsapp);
        assert!(!v.allowed);

        let v = order_verdict(&limits("active", Some(50), 10), OrderChannel::Whatsapp);
        assert!(v.allowed);
        assert_eq!(v.message, None);
    }

    #[test]
    fn only_owner_or_super_admin_may_record() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let claims = |role: &str| JwtClaims {
            sub: Some(stranger),
            role: role.to_string(),
            exp: 0,
        };

        assert!(ensure_owner(&claims(ROLE_AUTHENTICATED), owner, owner).is_ok());
        assert!(ensure_owner(&claims(ROLE_SUPER_ADMIN), stranger, owner).is_ok());

        let err = ensure_owner(&claims(ROLE_AUTHENTICATED), stranger, owner)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Forbidden: You do not have access to this store"
        );
    }
}
