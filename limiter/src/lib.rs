use std::{num::NonZeroU32, time::Duration};

use actix_web::{
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderValue, RETRY_AFTER},
};
use common::error::AppError;
use middleware::{client::ClientRateLimiter, global::GlobalLimiter};

pub mod plan;

pub mod middleware {
    pub mod client;
    pub mod global;
}

const FALLBACK_PERMITS: NonZeroU32 = NonZeroU32::MIN;

/// Rejects requests once the whole server exceeds `permits_per_second`.
/// A zero rate is raised to one request per second.
pub fn global_middleware(permits_per_second: u32) -> GlobalLimiter {
    GlobalLimiter::new(NonZeroU32::new(permits_per_second).unwrap_or(FALLBACK_PERMITS))
}

/// Same as [`global_middleware`] but counted per client IP.
pub fn client_middleware(permits_per_second: u32) -> ClientRateLimiter {
    ClientRateLimiter::new(NonZeroU32::new(permits_per_second).unwrap_or(FALLBACK_PERMITS))
}

/// 429 with a `Retry-After` rounded up to whole seconds.
pub(crate) fn too_many_requests(
    req: ServiceRequest,
    message: &str,
    wait: Duration,
) -> ServiceResponse<BoxBody> {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    let mut res = req.error_response(AppError::TooManyRequests(message.to_string()));
    res.headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(secs.max(1)));
    res
}
