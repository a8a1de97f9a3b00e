use actix_web::web;

pub mod routes {
    pub mod reviews;
}

pub mod services {
    pub mod places;
    pub mod quota;
    pub mod reviews;
}

pub mod dtos {
    pub mod reviews;
}

/// Slug of the Google Reviews add-on in `marketplace_purchases`.
pub const GOOGLE_REVIEWS_SLUG: &str = "google-reviews";

/// Registers the metered marketplace endpoints.
pub fn mount_market(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::reviews::post_google_reviews);
}
