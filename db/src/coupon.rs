use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::coupon::Coupon;

/// Looks a coupon up by store and already-normalized (upper-case) code.
pub async fn get_coupon_by_code<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    store_id: Uuid,
    code: &str,
) -> Res<Option<Coupon>> {
    sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE store_id = $1 AND UPPER(code) = $2")
        .bind(store_id)
        .bind(code)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}
