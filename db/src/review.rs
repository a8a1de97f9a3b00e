use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::purchase::ReviewsCache;

pub async fn get_cached_reviews<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    store_id: Uuid,
    place_id: &str,
) -> Res<Option<ReviewsCache>> {
    sqlx::query_as::<_, ReviewsCache>(
        "SELECT * FROM google_reviews_cache WHERE store_id = $1 AND place_id = $2",
    )
    .bind(store_id)
    .bind(place_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn upsert_cached_reviews<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    store_id: Uuid,
    place_id: &str,
    payload: &serde_json::Value,
    fetched_at: DateTime<Utc>,
) -> Res<()> {
    sqlx::query(
        r#"
        INSERT INTO google_reviews_cache (store_id, place_id, payload, fetched_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (store_id, place_id)
        DO UPDATE SET payload = EXCLUDED.payload, fetched_at = EXCLUDED.fetched_at
        "#,
    )
    .bind(store_id)
    .bind(place_id)
    .bind(payload)
    .bind(fetched_at)
    .execute(executor)
    .await?;
    Ok(())
}
