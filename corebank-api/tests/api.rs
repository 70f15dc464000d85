//! HTTP-level tests for the banking API: register, login, open an account,
//! post transactions, and walk the ledger through the public surface.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use corebank_api::api;
use corebank_api::app::account_service::AccountService;
use corebank_api::app::transaction_engine::TransactionEngine;
use corebank_api::app::user_service::UserService;
use corebank_api::domain::auth::TokenManager;
use corebank_api::infrastructure::storage::bank_store::BankStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

macro_rules! test_app {
    ($store:expr) => {{
        let store: Arc<BankStore> = Arc::clone(&$store);
        let tokens = Arc::new(TokenManager::new(
            "integration-test-secret-integration-test-secret",
            24,
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&store), (*tokens).clone()));
        let account_service = Arc::new(AccountService::new(Arc::clone(&store)));
        let engine = Arc::new(TransactionEngine::new(Arc::clone(&store)));
        test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .app_data(web::Data::new(tokens))
                .app_data(web::Data::new(user_service))
                .app_data(web::Data::new(account_service))
                .app_data(web::Data::new(engine))
                .configure(api::configure),
        )
        .await
    }};
}

fn register_body() -> Value {
    json!({
        "first_name": "Test",
        "last_name": "User",
        "email": "testuser@example.com",
        "phone_number": "555-0100",
        "password": "testpass123",
    })
}

/// Register, log in, and hand back the session cookie.
macro_rules! login {
    ($app:expr) => {{
        let resp = test::call_service(
            &$app,
            test::TestRequest::post()
                .uri("/api/users/register")
                .set_json(register_body())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &$app,
            test::TestRequest::post()
                .uri("/api/users/login")
                .set_json(json!({
                    "email": "testuser@example.com",
                    "password": "testpass123",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        resp.response()
            .cookies()
            .find(|c| c.name() == "jwt")
            .expect("login must set the jwt cookie")
            .into_owned()
    }};
}

/// Open an account through the API and return its JSON representation.
macro_rules! create_account {
    ($app:expr, $cookie:expr, $opening:expr) => {{
        let resp = test::call_service(
            &$app,
            test::TestRequest::post()
                .uri("/api/accounts")
                .cookie($cookie.clone())
                .set_json(json!({ "account_name": "Checking", "amount": $opening }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

#[actix_web::test]
async fn health_endpoint_is_public() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(BankStore::new(dir.path()).unwrap());
    let app = test_app!(store);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn api_routes_require_authentication() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(BankStore::new(dir.path()).unwrap());
    let app = test_app!(store);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/accounts")
            .set_json(json!({ "account_name": "Checking" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/users/me").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn duplicate_registration_returns_conflict() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(BankStore::new(dir.path()).unwrap());
    let app = test_app!(store);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(register_body())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(register_body())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn invalid_credentials_are_unauthorized() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(BankStore::new(dir.path()).unwrap());
    let app = test_app!(store);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(register_body())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({
                "email": "testuser@example.com",
                "password": "wrongpass",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn transaction_lifecycle_over_http() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(BankStore::new(dir.path()).unwrap());
    let app = test_app!(store);
    let cookie = login!(app);

    let account = create_account!(app, cookie, "500.00");
    let account_id = account["id"].as_i64().unwrap();
    assert_eq!(account["amount"], "500.00");

    // Debit 200.00 with a proxy header; the first hop lands in the entry.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/accounts/{account_id}/transactions"))
            .cookie(cookie.clone())
            .insert_header(("X-Forwarded-For", "1.2.3.4, 10.0.0.1"))
            .set_json(json!({
                "amount": "200.00",
                "description": "rent",
                "type": "DEBIT",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let entry: Value = test::read_body_json(resp).await;
    assert_eq!(entry["type"], "DEBIT");
    assert_eq!(entry["amount"], "200.00");
    assert_eq!(entry["description"], "rent");
    assert_eq!(entry["ip_address"], "1.2.3.4");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/accounts/{account_id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let account: Value = test::read_body_json(resp).await;
    assert_eq!(account["amount"], "300.00");

    // Overdraw attempt: 400, balance untouched.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/accounts/{account_id}/transactions"))
            .cookie(cookie.clone())
            .set_json(json!({
                "amount": "400.00",
                "description": "x",
                "type": "DEBIT",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INSUFFICIENT_FUNDS");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/accounts/{account_id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let account: Value = test::read_body_json(resp).await;
    assert_eq!(account["amount"], "300.00");
}

#[actix_web::test]
async fn transaction_error_statuses() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(BankStore::new(dir.path()).unwrap());
    let app = test_app!(store);
    let cookie = login!(app);

    // Unknown account: 404 even with an otherwise bad payload.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/accounts/9999/transactions")
            .cookie(cookie.clone())
            .set_json(json!({
                "amount": "10.00",
                "description": "x",
                "type": "DEBIT",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let account = create_account!(app, cookie, "100.00");
    let account_id = account["id"].as_i64().unwrap();

    // Unsupported type: 400 with the dedicated error code.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/accounts/{account_id}/transactions"))
            .cookie(cookie.clone())
            .set_json(json!({
                "amount": "10.00",
                "description": "x",
                "type": "TRANSFER",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_TRANSACTION_TYPE");

    // Malformed amount: 400 as a validation error.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/accounts/{account_id}/transactions"))
            .cookie(cookie.clone())
            .set_json(json!({
                "amount": "not-a-number",
                "description": "x",
                "type": "CREDIT",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn listing_is_newest_first_with_filter_and_pages() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(BankStore::new(dir.path()).unwrap());
    let app = test_app!(store);
    let cookie = login!(app);

    let account = create_account!(app, cookie, "0.00");
    let account_id = account["id"].as_i64().unwrap();

    for (amount, description) in [("10.00", "salary"), ("20.00", "salary"), ("30.00", "gift")] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/accounts/{account_id}/transactions"))
                .cookie(cookie.clone())
                .set_json(json!({
                    "amount": amount,
                    "description": description,
                    "type": "CREDIT",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/accounts/{account_id}/transactions"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["count"], 3);
    assert_eq!(page["page_size"], 10);
    let results = page["results"].as_array().unwrap();
    // Newest first: the gift was posted last.
    assert_eq!(results[0]["description"], "gift");
    assert_eq!(results[2]["description"], "salary");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/accounts/{account_id}/transactions?description=salary&page_size=1&page=2"
            ))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["count"], 2);
    assert_eq!(page["total_pages"], 2);
    let results = page["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["amount"], "10.00");
}

#[actix_web::test]
async fn deleting_the_user_cascades_over_http() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(BankStore::new(dir.path()).unwrap());
    let app = test_app!(store);
    let cookie = login!(app);

    let account = create_account!(app, cookie, "50.00");
    let account_id = account["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/users/me")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The session cookie now points at a deleted user.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/accounts/{account_id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert!(store.get_account(account_id).is_err());
}
