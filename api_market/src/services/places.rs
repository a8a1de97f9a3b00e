use std::time::Duration;

use common::{
    env_config::GooglePlacesConfig,
    error::{AppError, Res},
};
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the Google Places Details endpoint.
#[derive(Clone)]
pub struct PlacesClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceReview {
    pub author_name: String,
    pub rating: u8,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub relative_time_description: String,
    /// Unix seconds.
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceDetails {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<i64>,
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
}

#[derive(Deserialize)]
struct DetailsEnvelope {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<PlaceDetails>,
}

impl PlacesClient {
    pub fn new(config: &GooglePlacesConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Fetches name, rating and reviews of a place.
    pub async fn place_details(&self, place_id: &str) -> Res<PlaceDetails> {
        if self.api_key.is_empty() {
            return Err(AppError::Upstream(
                "Google Places API key is not configured".to_string(),
            ));
        }

        let response = self
            .client
            .get(format!("{}/details/json", self.base_url))
            .query(&[
                ("place_id", place_id),
                ("fields", "name,rating,user_ratings_total,reviews"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Google Places responded with {}",
                response.status()
            )));
        }

        let envelope: DetailsEnvelope = response.json().await?;
        parse_envelope(envelope)
    }
}

fn parse_envelope(envelope: DetailsEnvelope) -> Res<PlaceDetails> {
    if envelope.status != "OK" {
        return Err(AppError::Upstream(format!(
            "Google Places status {}: {}",
            envelope.status,
            envelope.error_message.unwrap_or_default()
        )));
    }
    envelope
        .result
        .ok_or_else(|| AppError::Upstream("Google Places returned no result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_yields_details() {
        let raw = serde_json::json!({
            "status": "OK",
            "result": {
                "name": "Chai Point",
                "rating": 4.6,
                "user_ratings_total": 212,
                "reviews": [{
                    "author_name": "Meera",
                    "rating": 5,
                    "text": "Great masala chai",
                    "relative_time_description": "a week ago",
                    "time": 1760000000
                }]
            }
        });
        let envelope: DetailsEnvelope = serde_json::from_value(raw).unwrap();
        let details = parse_envelope(envelope).unwrap();
        assert_eq!(details.name, "Chai Point");
        assert_eq!(details.user_ratings_total, Some(212));
        assert_eq!(details.reviews[0].profile_photo_url, None);
    }

    #[test]
    fn denied_status_is_upstream_error() {
        let raw = serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        });
        let envelope: DetailsEnvelope = serde_json::from_value(raw).unwrap();
        let err = parse_envelope(envelope).unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
