use actix_web::{HttpResponse, http::StatusCode};
use serde::Serialize;

use super::error::Res;

/// Shorthands for JSON responses returned by route handlers.
///
/// Business rejections (an invalid coupon, a blocked order) are successful
/// HTTP exchanges and go through [`Success::ok`] with a tagged body.
pub struct Success;

impl Success {
    pub fn ok<T: Serialize>(body: T) -> Res<HttpResponse> {
        Ok(HttpResponse::Ok().json(body))
    }

    /// Responds with an arbitrary status and a structured body, for errors
    /// that carry more than a message (e.g. quota details on a 429).
    pub fn with_status<T: Serialize>(status: StatusCode, body: T) -> Res<HttpResponse> {
        Ok(HttpResponse::build(status).json(body))
    }
}
