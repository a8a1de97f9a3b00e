use actix_web::{App, HttpResponse, http::StatusCode, test, web};
use common::jwt::{self, JwtClaims, ROLE_ANON, ROLE_AUTHENTICATED};
use uuid::Uuid;

const SECRET: &str = "extractor-test-secret";

async fn whoami(claims: web::ReqData<JwtClaims>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "role": claims.role }))
}

macro_rules! app {
    () => {
        test::init_service(
            App::new().wrap(extractor::middleware(SECRET)).service(
                web::scope("/api")
                    .wrap(extractor::require_auth())
                    .route("/whoami", web::get().to(whoami)),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn missing_token_is_unauthorized() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/whoami").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Authorization error: No authorization token provided"
    );
}

#[actix_web::test]
async fn forged_token_is_unauthorized() {
    let app = app!();
    let token = jwt::generate_jwt(None, ROLE_ANON, 1, "not-the-secret").unwrap();
    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn valid_token_reaches_handler_with_claims() {
    let app = app!();
    let token = jwt::generate_jwt(Some(Uuid::new_v4()), ROLE_AUTHENTICATED, 1, SECRET).unwrap();
    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["role"], ROLE_AUTHENTICATED);
}
