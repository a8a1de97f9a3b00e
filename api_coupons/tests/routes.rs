use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use common::{error::json_error_handler, jwt};
use sqlx::postgres::PgPoolOptions;

const SECRET: &str = "coupon-route-secret";

// The pool never connects: every request below is answered before a query runs.
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
                        .configure(api_coupons::mount_coupons),
                ),
        )
        .await
    }};
}

fn bearer() -> (&'static str, String) {
    let token = jwt::generate_jwt(None, jwt::ROLE_ANON, 1, SECRET).unwrap();
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn validate_requires_token() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/validate-coupon")
        .set_json(serde_json::json!({
            "couponCode": "SAVE10",
            "storeId": "8a4b7c52-6f1e-4c1a-9a8e-3b2d1f0e5c7a",
            "cartTotal": 3000,
            "customerPhone": "+919800000000"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn record_requires_token() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/record-coupon-usage")
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_body_is_bad_request() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/validate-coupon")
        .insert_header(bearer())
        .set_json(serde_json::json!({ "couponCode": "SAVE10", "storeId": "not-a-uuid" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Bad request"));
}

#[actix_web::test]
async fn blank_code_is_bad_request() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/validate-coupon")
        .insert_header(bearer())
        .set_json(serde_json::json!({
            "couponCode": "   ",
            "storeId": "8a4b7c52-6f1e-4c1a-9a8e-3b2d1f0e5c7a",
            "cartTotal": 3000,
            "customerPhone": "+919800000000"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Bad request: couponCode is required");
}

#[actix_web::test]
async fn negative_cart_total_is_bad_request() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/validate-coupon")
        .insert_header(bearer())
        .set_json(serde_json::json!({
            "couponCode": "SAVE10",
            "storeId": "8a4b7c52-6f1e-4c1a-9a8e-3b2d1f0e5c7a",
            "cartTotal": -1,
            "customerPhone": "+919800000000"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn record_without_phone_is_bad_request() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/record-coupon-usage")
        .insert_header(bearer())
        .set_json(serde_json::json!({
            "couponCode": "SAVE10",
            "storeId": "8a4b7c52-6f1e-4c1a-9a8e-3b2d1f0e5c7a",
            "orderId": "0f5e1d2c-3b4a-4968-8776-5a4b3c2d1e0f",
            "customerPhone": "",
            "discountApplied": 300
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
