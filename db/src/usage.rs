use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::dtos::usage::UsageCreateRequest;

pub async fn count_usage_by_coupon<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    coupon_id: Uuid,
) -> Res<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM coupon_usage WHERE coupon_id = $1")
        .bind(coupon_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn count_usage_by_phone<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    coupon_id: Uuid,
    phone: &str,
) -> Res<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM coupon_usage WHERE coupon_id = $1 AND customer_phone = $2",
    )
    .bind(coupon_id)
    .bind(phone)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn count_usage_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    coupon_id: Uuid,
    email: &str,
) -> Res<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM coupon_usage WHERE coupon_id = $1 AND LOWER(customer_email) = LOWER($2)",
    )
    .bind(coupon_id)
    .bind(email)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Appends a ledger row. Returns `false` when this order was already
/// recorded for the coupon.
pub async fn insert_usage<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: UsageCreateRequest,
) -> Res<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO coupon_usage (coupon_id, order_id, customer_phone, customer_email, discount_applied)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (coupon_id, order_id) DO NOTHING
        "#,
    )
    .bind(data.coupon_id)
    .bind(data.order_id)
    .bind(data.customer_phone)
    .bind(data.customer_email)
    .bind(data.discount_applied)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}
