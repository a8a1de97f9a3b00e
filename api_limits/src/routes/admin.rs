use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::{
    error::Res,
    http::Success,
    jwt::{JwtClaims, ROLE_SUPER_ADMIN},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::services;

/// Resets the WhatsApp and website order counters of a user's subscription.
///
/// # Output
/// - 200 with the zeroed counters
/// - 403 unless the caller is a `super_admin`
/// - 404 when the user has no subscription
#[post("/subscriptions/{user_id}/reset-usage")]
pub async fn post_reset_usage(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<Uuid>,
) -> Res<impl Responder> {
    claims.require_role(ROLE_SUPER_ADMIN)?;

    let user_id = path.into_inner();
    log::info!(
        "Admin {:?} resetting order usage of user {}",
        claims.sub,
        user_id
    );
    let reset = services::limits::reset_usage(&pool, user_id).await?;
    Success::ok(reset)
}
