use middleware::{auth::RequireAuth, extractor::ExtractionMiddleware};

pub mod middleware {
    pub mod auth;
    pub mod extractor;
}

/// Decodes the bearer token (if any) into request extensions.
pub fn middleware(jwt_secret: &str) -> ExtractionMiddleware {
    ExtractionMiddleware::new(jwt_secret)
}

/// Rejects requests without valid claims with 401.
/// Must be registered inside [`middleware`].
pub fn require_auth() -> RequireAuth {
    RequireAuth::new()
}
