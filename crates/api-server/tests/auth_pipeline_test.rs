//! Integration tests for the authenticated request pipeline
//!
//! Runs the real route table against a mocked domain service.
//!
//! # Test Coverage
//!
//! - Protected routes reject missing, expired and wrong-kind tokens before the
//!   domain service is reached
//! - POST /register, POST /login, POST /refresh, DELETE /logout
//! - GET /current, PATCH /update, PATCH /change_password
//! - Error envelope shape for validation, domain and internal failures

#[macro_use]
mod common;

use actix_web::{http::Method, test};
use serde_json::{json, Value};
use shared::Error;

use crate::common::{
    access_token, bearer, expired_access_token, refresh_token, sample_user, MockUserService,
    TEST_ACCESS_TTL_SECS, TEST_USER_ID,
};

const PROTECTED_ROUTES: [(&str, &str); 13] = [
    ("GET", "/current"),
    ("DELETE", "/logout"),
    ("PATCH", "/update"),
    ("PATCH", "/change_password"),
    ("PATCH", "/change_profile"),
    ("POST", "/add_account"),
    ("GET", "/accounts"),
    ("GET", "/account/acc-1"),
    ("PATCH", "/account/acc-1"),
    ("DELETE", "/account/acc-1"),
    ("POST", "/withdrawal"),
    ("POST", "/follow/user-2"),
    ("GET", "/accounts?page=1&size=5"),
];

/// A mock that fails the test if anything at all reaches it
fn untouchable_service() -> MockUserService {
    let mut service = MockUserService::new();
    service.expect_get_by_id().times(0);
    service.expect_update().times(0);
    service.expect_logout().times(0);
    service.expect_list_accounts().times(0);
    service.expect_add_account().times(0);
    service.expect_withdraw().times(0);
    service
}

fn protected_request(method: &str, uri: &str) -> test::TestRequest {
    let method = Method::from_bytes(method.as_bytes()).unwrap();
    test::TestRequest::default()
        .method(method)
        .uri(uri)
        .set_json(json!({"name": "Jane", "amount": 10, "account_id": "acc-1"}))
}

// ============================================================================
// Authentication gate
// ============================================================================

#[actix_web::test]
async fn test_unknown_path_is_not_found_without_token() {
    let app = init_test_app!(untouchable_service());

    for uri in ["/does-not-exist", "/accounts/extra/segments", "/v1/current"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["error"], "not_found");
    }
}

#[actix_web::test]
async fn test_unknown_path_is_not_found_with_token() {
    let app = init_test_app!(untouchable_service());

    let req = test::TestRequest::get()
        .uri("/does-not-exist")
        .insert_header(bearer(&access_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_protected_routes_without_token_are_unauthenticated() {
    let app = init_test_app!(untouchable_service());

    for (method, uri) in PROTECTED_ROUTES {
        let req = protected_request(method, uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401, "{} {}", method, uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["error"], "unauthenticated");
    }
}

#[actix_web::test]
async fn test_expired_token_is_unauthenticated() {
    let app = init_test_app!(untouchable_service());

    let req = test::TestRequest::get()
        .uri("/current")
        .insert_header(bearer(&expired_access_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_refresh_token_cannot_be_used_as_access_token() {
    let app = init_test_app!(untouchable_service());

    let req = test::TestRequest::get()
        .uri("/current")
        .insert_header(bearer(&refresh_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_non_bearer_scheme_is_unauthenticated() {
    let app = init_test_app!(untouchable_service());

    let req = test::TestRequest::get()
        .uri("/current")
        .insert_header(("Authorization", format!("Token {}", access_token(TEST_USER_ID))))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_current_returns_profile_of_principal() {
    let mut service = MockUserService::new();
    service
        .expect_get_by_id()
        .withf(|user_id| user_id == TEST_USER_ID)
        .times(1)
        .returning(|user_id| Ok(sample_user(user_id)));
    let app = init_test_app!(service);

    let req = test::TestRequest::get()
        .uri("/current")
        .insert_header(bearer(&access_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["id"], TEST_USER_ID);
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["paging"].is_null());
    assert!(body["errors"].is_null());
}

// ============================================================================
// Register / Login
// ============================================================================

#[actix_web::test]
async fn test_register_created() {
    let mut service = MockUserService::new();
    service
        .expect_register()
        .withf(|req| req.email == "jane@example.com")
        .times(1)
        .returning(|_| Ok(sample_user("user-new")));
    let app = init_test_app!(service);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "081234567890",
            "password": "securepassword123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["id"], "user-new");
}

#[actix_web::test]
async fn test_register_invalid_input_never_reaches_service() {
    let mut service = MockUserService::new();
    service.expect_register().times(0);
    let app = init_test_app!(service);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({
            "name": "",
            "email": "not-an-email",
            "phone": "081234567890",
            "password": "securepassword123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["error"], "validation_error");
    assert!(body["errors"]["details"].get("email").is_some());
    assert!(body["errors"]["details"].get("name").is_some());
}

#[actix_web::test]
async fn test_register_missing_field_is_validation_error() {
    let mut service = MockUserService::new();
    service.expect_register().times(0);
    let app = init_test_app!(service);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({"name": "Jane Doe", "email": "jane@example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["error"], "validation_error");
}

#[actix_web::test]
async fn test_register_conflict_is_forwarded() {
    let mut service = MockUserService::new();
    service
        .expect_register()
        .returning(|_| Err(Error::conflict("Email already registered")));
    let app = init_test_app!(service);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "081234567890",
            "password": "securepassword123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["message"], "Email already registered");
}

#[actix_web::test]
async fn test_login_returns_token_pair() {
    let mut service = MockUserService::new();
    service
        .expect_login()
        .withf(|req| req.email_or_phone == "a@b.com" && req.password == "x")
        .times(1)
        .returning(|_| Ok(sample_user(TEST_USER_ID)));
    let app = init_test_app!(service);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"email_or_phone": "a@b.com", "password": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert!(!data["access_token"].as_str().unwrap().is_empty());
    assert!(!data["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(data["token_type"], "bearer");
    assert_eq!(data["expires_in"].as_i64().unwrap(), TEST_ACCESS_TTL_SECS);
    assert!(body["errors"].is_null());

    // The issued access token opens protected routes
    let claims = common::test_codec()
        .verify(
            data["access_token"].as_str().unwrap(),
            api_server::services::TokenKind::Access,
        )
        .unwrap();
    assert_eq!(claims.sub, TEST_USER_ID);
}

#[actix_web::test]
async fn test_login_invalid_credentials() {
    let mut service = MockUserService::new();
    service
        .expect_login()
        .returning(|_| Err(Error::authentication("Invalid credentials")));
    let app = init_test_app!(service);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"email_or_phone": "a@b.com", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["message"], "Invalid credentials");
}

#[actix_web::test]
async fn test_malformed_json_is_validation_error() {
    let mut service = MockUserService::new();
    service.expect_login().times(0);
    let app = init_test_app!(service);

    let req = test::TestRequest::post()
        .uri("/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["error"], "validation_error");
}

// ============================================================================
// Logout / Refresh
// ============================================================================

#[actix_web::test]
async fn test_logout_without_refresh_header_is_validation_error() {
    let mut service = MockUserService::new();
    service.expect_logout().times(0);
    let app = init_test_app!(service);

    let req = test::TestRequest::delete()
        .uri("/logout")
        .insert_header(bearer(&access_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["error"], "validation_error");
}

#[actix_web::test]
async fn test_logout_revokes_refresh_token() {
    let token = refresh_token(TEST_USER_ID);
    let expected = token.clone();

    let mut service = MockUserService::new();
    service
        .expect_logout()
        .withf(move |user_id, refresh, _| user_id == TEST_USER_ID && refresh == expected)
        .times(1)
        .returning(|_, _, _| Ok(true));
    let app = init_test_app!(service);

    let req = test::TestRequest::delete()
        .uri("/logout")
        .insert_header(bearer(&access_token(TEST_USER_ID)))
        .insert_header(("X-Refresh-Token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_logout_with_someone_elses_refresh_token_is_forbidden() {
    let mut service = MockUserService::new();
    service.expect_logout().times(0);
    let app = init_test_app!(service);

    let req = test::TestRequest::delete()
        .uri("/logout")
        .insert_header(bearer(&access_token(TEST_USER_ID)))
        .insert_header(("X-Refresh-Token", refresh_token("user-2")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn test_logout_with_access_token_as_refresh_is_unauthenticated() {
    let mut service = MockUserService::new();
    service.expect_logout().times(0);
    let app = init_test_app!(service);

    let req = test::TestRequest::delete()
        .uri("/logout")
        .insert_header(bearer(&access_token(TEST_USER_ID)))
        .insert_header(("X-Refresh-Token", access_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_refresh_rotates_token_pair() {
    let mut service = MockUserService::new();
    service
        .expect_is_refresh_token_revoked()
        .times(1)
        .returning(|_| Ok(false));
    service
        .expect_get_by_id()
        .returning(|user_id| Ok(sample_user(user_id)));
    service
        .expect_logout()
        .withf(|user_id, _, _| user_id == TEST_USER_ID)
        .times(1)
        .returning(|_, _, _| Ok(true));
    let app = init_test_app!(service);

    let req = test::TestRequest::post()
        .uri("/refresh")
        .insert_header(("X-Refresh-Token", refresh_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert!(!body["data"]["access_token"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn test_refresh_rejects_revoked_token() {
    let mut service = MockUserService::new();
    service
        .expect_is_refresh_token_revoked()
        .returning(|_| Ok(true));
    service.expect_get_by_id().times(0);
    service.expect_logout().times(0);
    let app = init_test_app!(service);

    let req = test::TestRequest::post()
        .uri("/refresh")
        .insert_header(("X-Refresh-Token", refresh_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_refresh_loses_race_to_concurrent_revocation() {
    let mut service = MockUserService::new();
    service
        .expect_is_refresh_token_revoked()
        .returning(|_| Ok(false));
    service
        .expect_get_by_id()
        .returning(|user_id| Ok(sample_user(user_id)));
    // Another request revoked the same token between the check and the insert
    service
        .expect_logout()
        .times(1)
        .returning(|_, _, _| Ok(false));
    let app = init_test_app!(service);

    let req = test::TestRequest::post()
        .uri("/refresh")
        .insert_header(("X-Refresh-Token", refresh_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["error"], "unauthenticated");
    assert!(body["data"].is_null());
}

#[actix_web::test]
async fn test_logout_twice_is_still_ok() {
    let mut service = MockUserService::new();
    service
        .expect_logout()
        .times(1)
        .returning(|_, _, _| Ok(false));
    let app = init_test_app!(service);

    let req = test::TestRequest::delete()
        .uri("/logout")
        .insert_header(bearer(&access_token(TEST_USER_ID)))
        .insert_header(("X-Refresh-Token", refresh_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

// ============================================================================
// Subject stamping
// ============================================================================

#[actix_web::test]
async fn test_update_uses_principal_not_body_id() {
    let mut service = MockUserService::new();
    service
        .expect_update()
        .withf(|req| req.subject() == TEST_USER_ID && req.payload().name.as_deref() == Some("Jane"))
        .times(1)
        .returning(|req| Ok(sample_user(req.subject())));
    let app = init_test_app!(service);

    let req = test::TestRequest::patch()
        .uri("/update")
        .insert_header(bearer(&access_token(TEST_USER_ID)))
        .set_json(json!({"id": "someone-else", "subject": "someone-else", "name": "Jane"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["id"], TEST_USER_ID);
}

#[actix_web::test]
async fn test_change_password_wrong_current_password() {
    let mut service = MockUserService::new();
    service
        .expect_change_password()
        .withf(|req| req.subject() == TEST_USER_ID)
        .returning(|_| Err(Error::validation("Current password is incorrect")));
    let app = init_test_app!(service);

    let req = test::TestRequest::patch()
        .uri("/change_password")
        .insert_header(bearer(&access_token(TEST_USER_ID)))
        .set_json(json!({"old_password": "wrong", "new_password": "newpassword123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["message"], "Current password is incorrect");
}

// ============================================================================
// Internal failures
// ============================================================================

#[actix_web::test]
async fn test_internal_error_message_is_suppressed() {
    let mut service = MockUserService::new();
    service
        .expect_get_by_id()
        .returning(|_| Err(Error::internal("connection to 10.0.0.5 refused")));
    let app = init_test_app!(service);

    let req = test::TestRequest::get()
        .uri("/current")
        .insert_header(bearer(&access_token(TEST_USER_ID)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["error"], "internal_error");
    assert!(!body["errors"]["message"]
        .as_str()
        .unwrap()
        .contains("10.0.0.5"));
}
