use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

/// Counts a customer's orders in a store, matching on phone or email.
pub async fn count_orders_by_customer<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    store_id: Uuid,
    phone: &str,
    email: Option<&str>,
) -> Res<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM orders
        WHERE store_id = $1
          AND (customer_phone = $2 OR ($3::TEXT IS NOT NULL AND LOWER(customer_email) = LOWER($3)))
        "#,
    )
    .bind(store_id)
    .bind(phone)
    .bind(email)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
