use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub async fn get_store_owner<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    store_id: Uuid,
) -> Res<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM stores WHERE id = $1")
        .bind(store_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Live count of published products across every store the user owns.
pub async fn count_published_products_by_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM products p
        JOIN stores s ON s.id = p.store_id
        WHERE s.user_id = $1 AND p.is_published
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
