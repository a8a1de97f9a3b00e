use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::{dtos::limits::OrderLimitRequest, services};

/// Limits snapshot for the signed-in store owner's dashboard.
#[get("/dashboard/limits")]
pub async fn get_limits(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let user_id = claims.user_id()?;
    let snapshot = services::limits::get_snapshot(&pool, user_id).await?;
    Success::ok(snapshot)
}

/// Asked by the storefront before an order is placed.
///
/// # Output
/// - 200 with `{allowed, message?}`
/// - 404 when the store does not exist
#[post("/order-limit/check")]
pub async fn post_check_order_limit(
    pool: web::Data<Arc<PgPool>>,
    req: web::Json<OrderLimitRequest>,
) -> Res<impl Responder> {
    let verdict = services::limits::check_order_limit(&pool, req.into_inner()).await?;
    Success::ok(verdict)
}

/// Counts a placed order against the store's plan.
///
/// # Output
/// - 200 with `{success, used}`
/// - 401 for anonymous callers
/// - 403 unless the caller owns the store or is a super_admin
#[post("/order-limit/record")]
pub async fn post_record_order(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    req: web::Json<OrderLimitRequest>,
) -> Res<impl Responder> {
    let recorded = services::limits::record_order(&pool, &claims, req.into_inner()).await?;
    Success::ok(recorded)
}
