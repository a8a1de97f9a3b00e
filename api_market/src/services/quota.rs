//! Monthly call quota for marketplace add-ons.
//!
//! Rollover is lazy: the first metered call of a new calendar month (UTC)
//! zeroes `calls_used` before the limit is checked. An allowed call is
//! counted before the metered work runs, so a failing downstream call still
//! consumes quota.

use chrono::{DateTime, Utc};
use common::{
    error::Res,
    period::{next_month_start, period_label, same_month},
};
use db::{dtos::purchase::PurchaseUsageUpdate, models::purchase::MarketplacePurchase};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Counter state of a purchase after the meter ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaState {
    pub purchase_id: Uuid,
    pub used: i32,
    pub limit: i32,
    pub last_reset: DateTime<Utc>,
    pub rolled_over: bool,
    pub period: String,
    pub reset_at: DateTime<Utc>,
}

impl QuotaState {
    pub fn remaining(&self) -> i32 {
        (self.limit - self.used).max(0)
    }

    pub fn usage(&self) -> QuotaUsage {
        QuotaUsage {
            used: self.used,
            limit: self.limit,
            remaining: self.remaining(),
            period: self.period.clone(),
        }
    }
}

/// The `quota` block returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaUsage {
    pub used: i32,
    pub limit: i32,
    pub remaining: i32,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The call may proceed; `used` already includes it.
    Allowed(QuotaState),
    Exceeded(QuotaState),
    Expired { purchase_id: Uuid },
    /// No purchase, or one whose status is not `active`.
    Inactive,
}

/// Decides a metered call against a purchase row. Pure; the caller persists
/// the returned counters.
pub fn evaluate(purchase: &MarketplacePurchase, now: DateTime<Utc>) -> QuotaDecision {
    if purchase.status != "active" {
        return QuotaDecision::Inactive;
    }

    let rolled_over = !same_month(purchase.last_reset, now);
    let (used, last_reset) = if rolled_over {
        (0, now)
    } else {
        (purchase.calls_used, purchase.last_reset)
    };

    if purchase.expires_at.is_some_and(|expires| expires < now) {
        return QuotaDecision::Expired {
            purchase_id: purchase.id,
        };
    }

    let mut state = QuotaState {
        purchase_id: purchase.id,
        used,
        limit: purchase.quota_limit,
        last_reset,
        rolled_over,
        period: period_label(now),
        reset_at: next_month_start(now),
    };

    if used >= purchase.quota_limit {
        return QuotaDecision::Exceeded(state);
    }

    state.used = used + 1;
    QuotaDecision::Allowed(state)
}

/// Meters one call of `feature_slug` for a store.
///
/// The purchase row stays locked from read to write-back, so concurrent
/// calls for the same purchase are serialized and rollover happens once.
pub async fn meter(
    pool: &PgPool,
    store_id: Uuid,
    feature_slug: &str,
    now: DateTime<Utc>,
) -> Res<QuotaDecision> {
    let mut tx = pool.begin().await?;

    let Some(purchase) =
        db::purchase::get_purchase_for_update(&mut *tx, store_id, feature_slug).await?
    else {
        tx.commit().await?;
        return Ok(QuotaDecision::Inactive);
    };

    let decision = evaluate(&purchase, now);
    match &decision {
        QuotaDecision::Allowed(state) => {
            if state.rolled_over {
                log::info!(
                    "Quota of purchase {} rolled over to {}",
                    state.purchase_id,
                    state.period
                );
            }
            write_back(&mut tx, state).await?;
        }
        QuotaDecision::Exceeded(state) => {
            if state.rolled_over {
                write_back(&mut tx, state).await?;
            }
            log::warn!(
                "Quota exceeded for {} in store {} ({}/{})",
                feature_slug,
                store_id,
                state.used,
                state.limit
            );
        }
        QuotaDecision::Expired { purchase_id } => {
            db::purchase::mark_purchase_expired(&mut *tx, *purchase_id).await?;
            log::warn!("Purchase {} of store {} has expired", purchase_id, store_id);
        }
        QuotaDecision::Inactive => {}
    }

    tx.commit().await?;
    Ok(decision)
}

async fn write_back(tx: &mut sqlx::PgConnection, state: &QuotaState) -> Res<()> {
    db::purchase::update_purchase_usage(
        tx,
        PurchaseUsageUpdate {
            purchase_id: state.purchase_id,
            calls_used: state.used,
            last_reset: state.last_reset,
        },
    )
    .await
}
