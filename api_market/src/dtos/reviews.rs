use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::{places::PlaceReview, quota::QuotaUsage};

#[derive(Debug, Deserialize)]
pub struct GoogleReviewsRequest {
    pub store_id: Uuid,
    pub google_place_id: String,
}

impl GoogleReviewsRequest {
    pub fn validate(&self) -> Res<()> {
        if self.google_place_id.trim().is_empty() {
            return Err(AppError::BadRequest(
                "google_place_id is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Review data as cached and as returned to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewsPayload {
    pub place_name: String,
    pub rating: Option<f64>,
    pub total_ratings: Option<i64>,
    pub reviews: Vec<PlaceReview>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct GoogleReviewsResponse {
    #[serde(flatten)]
    pub payload: ReviewsPayload,
    pub stale: bool,
    pub quota: QuotaUsage,
}

#[derive(Debug, Serialize)]
pub struct QuotaExceededResponse {
    pub error: String,
    pub quota: QuotaUsage,
    pub reset_at: DateTime<Utc>,
}
