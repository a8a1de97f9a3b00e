use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::purchase::PurchaseUsageUpdate, models::purchase::MarketplacePurchase};

/// Latest purchase of a feature by a store, row-locked until the
/// surrounding transaction ends.
pub async fn get_purchase_for_update<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    store_id: Uuid,
    feature_slug: &str,
) -> Res<Option<MarketplacePurchase>> {
    sqlx::query_as::<_, MarketplacePurchase>(
        r#"
        SELECT * FROM marketplace_purchases
        WHERE store_id = $1 AND feature_slug = $2
        ORDER BY created_at DESC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(store_id)
    .bind(feature_slug)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_purchase_usage<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: PurchaseUsageUpdate,
) -> Res<()> {
    sqlx::query("UPDATE marketplace_purchases SET calls_used = $1, last_reset = $2 WHERE id = $3")
        .bind(data.calls_used)
        .bind(data.last_reset)
        .bind(data.purchase_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn mark_purchase_expired<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    purchase_id: Uuid,
) -> Res<()> {
    sqlx::query("UPDATE marketplace_purchases SET status = 'expired' WHERE id = $1")
        .bind(purchase_id)
        .execute(executor)
        .await?;
    Ok(())
}
