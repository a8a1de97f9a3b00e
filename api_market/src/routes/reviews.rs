use std::sync::Arc;

use actix_web::{HttpResponse, http::StatusCode, post, web};
use chrono::Utc;
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::{
    dtos::reviews::GoogleReviewsRequest,
    services::{
        self,
        places::PlacesClient,
        reviews::ReviewsOutcome,
    },
};

/// Metered Google Reviews lookup for a store's dashboard.
///
/// # Input
/// - `store_id`, `google_place_id`
///
/// # Output
/// - 200 with the reviews, `stale` and the `quota` block
/// - 400 on an empty place id
/// - 403 without an active, unexpired purchase
/// - 429 with quota details and `reset_at` when the month's calls are used up
/// - 502 when Google fails and nothing is cached
#[post("/google-reviews")]
pub async fn post_google_reviews(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    places: web::Data<PlacesClient>,
    req: web::Json<GoogleReviewsRequest>,
) -> Res<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    services::reviews::ensure_store_access(&pool, &claims, req.store_id).await?;

    let outcome = services::reviews::fetch_reviews(&pool, &places, req, Utc::now()).await?;
    respond(outcome)
}

fn respond(outcome: ReviewsOutcome) -> Res<HttpResponse> {
    match outcome {
        ReviewsOutcome::Fetched(reviews) => Success::ok(reviews),
        ReviewsOutcome::QuotaExceeded(body) => {
            Success::with_status(StatusCode::TOO_MANY_REQUESTS, body)
        }
    }
}
