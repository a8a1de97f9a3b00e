use chrono::{DateTime, Utc};
use common::{
    error::{AppError, Res},
    jwt::{JwtClaims, ROLE_SUPER_ADMIN},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    GOOGLE_REVIEWS_SLUG,
    dtos::reviews::{
        GoogleReviewsRequest, GoogleReviewsResponse, QuotaExceededResponse, ReviewsPayload,
    },
    services::{
        places::{PlaceDetails, PlacesClient},
        quota::{self, QuotaDecision, QuotaState},
    },
};

pub enum ReviewsOutcome {
    Fetched(GoogleReviewsResponse),
    QuotaExceeded(QuotaExceededResponse),
}

/// Only the store's owner (or a platform admin) may spend its quota.
pub async fn ensure_store_access(pool: &PgPool, claims: &JwtClaims, store_id: Uuid) -> Res<()> {
    let user_id = claims.user_id()?;
    let owner = db::store::get_store_owner(pool, store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;

    if owner != user_id && claims.role != ROLE_SUPER_ADMIN {
        return Err(AppError::Forbidden(
            "You do not have access to this store".to_string(),
        ));
    }
    Ok(())
}

/// Meters one Google Reviews lookup and performs it.
///
/// Quota is consumed before Google is called. When the lookup fails the
/// last cached payload for the place is served as stale; without one the
/// upstream error is returned.
pub async fn fetch_reviews(
    pool: &PgPool,
    places: &PlacesClient,
    req: GoogleReviewsRequest,
    now: DateTime<Utc>,
) -> Res<ReviewsOutcome> {
    let decision = quota::meter(pool, req.store_id, GOOGLE_REVIEWS_SLUG, now).await?;
    let state = match admit(decision)? {
        Ok(state) => state,
        Err(exceeded) => return Ok(ReviewsOutcome::QuotaExceeded(exceeded)),
    };

    let place_id = req.google_place_id.trim();
    let details = match places.place_details(place_id).await {
        Ok(details) => details,
        Err(err) => {
            log::warn!("Google Places lookup for {} failed: {}", place_id, err);
            let cached = db::review::get_cached_reviews(pool, req.store_id, place_id)
                .await?
                .and_then(|row| serde_json::from_value::<ReviewsPayload>(row.payload).ok());

            return match cached {
                Some(payload) => Ok(ReviewsOutcome::Fetched(GoogleReviewsResponse {
                    payload,
                    stale: true,
                    quota: state.usage(),
                })),
                None => Err(err),
            };
        }
    };

    let payload = to_payload(details, now);
    let value = serde_json::to_value(&payload)
        .map_err(|e| AppError::Internal(format!("Failed to encode reviews: {}", e)))?;
    db::review::upsert_cached_reviews(pool, req.store_id, place_id, &value, now).await?;

    Ok(ReviewsOutcome::Fetched(GoogleReviewsResponse {
        payload,
        stale: false,
        quota: state.usage(),
    }))
}

/// Turns a meter decision into the state to continue with, the 429 body,
/// or a 403 for a missing or expired purchase.
pub fn admit(decision: QuotaDecision) -> Res<Result<QuotaState, QuotaExceededResponse>> {
    match decision {
        QuotaDecision::Allowed(state) => Ok(Ok(state)),
        QuotaDecision::Exceeded(state) => Ok(Err(QuotaExceededResponse {
            error: "Monthly quota exceeded".to_string(),
            quota: state.usage(),
            reset_at: state.reset_at,
        })),
        QuotaDecision::Expired { .. } => Err(AppError::Forbidden(
            "Google Reviews purchase has expired".to_string(),
        )),
        QuotaDecision::Inactive => Err(AppError::Forbidden(
            "No active Google Reviews purchase".to_string(),
        )),
    }
}

fn to_payload(details: PlaceDetails, fetched_at: DateTime<Utc>) -> ReviewsPayload {
    ReviewsPayload {
        place_name: details.name,
        rating: details.rating,
        total_ratings: details.user_ratings_total,
        reviews: details.reviews,
        fetched_at,
    }
}
