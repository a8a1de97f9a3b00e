use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use common::{error::json_error_handler, jwt};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

const SECRET: &str = "limits-route-secret";

// Requests below are all rejected before the pool is touched.
macro_rules! app {
    () => {{
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://storefront@localhost/unused")
            .unwrap();
        test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(pool)))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .wrap(extractor::middleware(SECRET))
                .service(
                    web::scope("/api")
                        .wrap(extractor::require_auth())
                        .service(api_limits::mount_admin())
                        .configure(api_limits::mount_limits),
                ),
        )
        .await
    }};
}

fn bearer(sub: Option<Uuid>, role: &str) -> (&'static str, String) {
    let token = jwt::generate_jwt(sub, role, 1, SECRET).unwrap();
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn dashboard_requires_token() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/api/dashboard/limits")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn dashboard_rejects_anonymous_token() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/api/dashboard/limits")
        .insert_header(bearer(None, jwt::ROLE_ANON))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn reset_requires_super_admin() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/dashboard/admin/subscriptions/{}/reset-usage",
            Uuid::new_v4()
        ))
        .insert_header(bearer(Some(Uuid::new_v4()), jwt::ROLE_AUTHENTICATED))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Forbidden: Role 'super_admin' is required");
}

#[actix_web::test]
async fn unknown_channel_is_bad_request() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/order-limit/check")
        .insert_header(bearer(None, jwt::ROLE_ANON))
        .set_json(serde_json::json!({
            "storeId": Uuid::new_v4(),
            "channel": "telegram"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn anonymous_token_cannot_record_orders() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/order-limit/record")
        .insert_header(bearer(None, jwt::ROLE_ANON))
        .set_json(serde_json::json!({
            "storeId": Uuid::new_v4(),
            "channel": "website"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
