use actix_cors::Cors;
use actix_web::http::header;

/// Storefront pages and the owner dashboard are served from `origin` and
/// authenticate with bearer tokens, so no credentials are shared.
pub fn middleware(origin: &str) -> Cors {
    Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .allowed_origin(origin)
        .max_age(3600)
}
