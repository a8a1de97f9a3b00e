use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::subscription::{OrderChannel, Subscription, SubscriptionPlan};

/// The user's current subscription is the most recently created one.
pub async fn get_latest_subscription_by_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<Subscription>> {
    sqlx::query_as::<_, Subscription>(
        "SELECT * FROM subscriptions WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_plan_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    plan_id: Uuid,
) -> Res<Option<SubscriptionPlan>> {
    sqlx::query_as::<_, SubscriptionPlan>("SELECT * FROM subscription_plans WHERE id = $1")
        .bind(plan_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Bumps the used-counter of one order channel and returns its new value.
pub async fn increment_order_counter<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    subscription_id: Uuid,
    channel: OrderChannel,
) -> Res<Option<i32>> {
    let sql = match channel {
        OrderChannel::Whatsapp => {
            r#"
            UPDATE subscriptions
            SET whatsapp_orders_used = whatsapp_orders_used + 1, updated_at = now()
            WHERE id = $1
            RETURNING whatsapp_orders_used
            "#
        }
        OrderChannel::Website => {
            r#"
            UPDATE subscriptions
            SET website_orders_used = website_orders_used + 1, updated_at = now()
            WHERE id = $1
            RETURNING website_orders_used
            "#
        }
    };

    sqlx::query_scalar::<_, i32>(sql)
        .bind(subscription_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn reset_order_counters<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    subscription_id: Uuid,
) -> Res<Subscription> {
    sqlx::query_as::<_, Subscription>(
        r#"
        UPDATE subscriptions
        SET whatsapp_orders_used = 0, website_orders_used = 0, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(subscription_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
