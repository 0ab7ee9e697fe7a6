//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Datelike, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;
use traevo_core::db::Database;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, ServerConfig::new(TokenConfig::new("test-secret")))
}

async fn get_body_json(response: axum::response::Response) -> Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, get_body_json(response).await)
}

/// Money fields are serialized as strings
fn money(v: &Value) -> Decimal {
    match v {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap(),
        other => panic!("not a money value: {}", other),
    }
}

/// Register and log in, returning the access token
async fn signup(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "Test User", "email": email, "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["access_token"].as_str().unwrap().to_string()
}

async fn food_category(app: &Router, token: &str) -> i64 {
    let (_, json) = send(app, "GET", "/api/categories", Some(token), None).await;
    json.as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Food")
        .unwrap()["id"]
        .as_i64()
        .unwrap()
}

// ========== Health & Auth ==========

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_test_app();
    let (status, json) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["name"], "traevo");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = setup_test_app();
    let (status, json) = send(&app, "GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/transactions", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_hides_password_and_rejects_duplicates() {
    let app = setup_test_app();
    let body = json!({"name": "Carla Dias", "email": "Carla@Example.com", "password": "secret123"});

    let (status, json) = send(&app, "POST", "/api/auth/register", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["email"], "carla@example.com");
    assert!(json.get("password_hash").is_none());

    let (status, json) = send(&app, "POST", "/api/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("already registered"));
}

#[tokio::test]
async fn test_register_validation() {
    let app = setup_test_app();
    for body in [
        json!({"name": "Jo", "email": "jo@example.com", "password": "secret123"}),
        json!({"name": "Joana", "email": "joana", "password": "secret123"}),
        json!({"name": "Joana", "email": "joana@example.com", "password": "12345"}),
    ] {
        let (status, _) = send(&app, "POST", "/api/auth/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = setup_test_app();
    signup(&app, "a@example.com").await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "a@example.com", "password": "nope-nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid email or password");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_logins() {
    let app = setup_test_app();
    signup(&app, "a@example.com").await;
    signup(&app, "b@example.com").await;

    let login = |email: &'static str, password: &'static str| {
        let app = app.clone();
        async move {
            send(
                &app,
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"email": email, "password": password})),
            )
            .await
        }
    };

    let (a, b, bad) = tokio::join!(
        login("a@example.com", "secret123"),
        login("b@example.com", "secret123"),
        login("a@example.com", "wrong-pass"),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert!(a.1["access_token"].is_string());
    assert_eq!(b.0, StatusCode::OK);
    assert_eq!(bad.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_flow() {
    let app = setup_test_app();
    signup(&app, "a@example.com").await;
    let (_, tokens) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "a@example.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(tokens["token_type"], "bearer");
    let access = tokens["access_token"].as_str().unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let (status, fresh) = send(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({"refresh_token": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(fresh["access_token"].is_string());

    // Access tokens can't be used to refresh
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({"refresh_token": access})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Refresh tokens can't be used as bearer tokens
    let (status, _) = send(&app, "GET", "/api/users/me", Some(refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ========== Profile ==========

#[tokio::test]
async fn test_profile_get_and_update() {
    let app = setup_test_app();
    let token = signup(&app, "a@example.com").await;
    signup(&app, "b@example.com").await;

    let (status, me) = send(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "a@example.com");

    let (status, me) = send(
        &app,
        "PATCH",
        "/api/users/me",
        Some(&token),
        Some(json!({"name": "Renamed User"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Renamed User");

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/users/me",
        Some(&token),
        Some(json!({"email": "b@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "PATCH", "/api/users/me", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Categories ==========

#[tokio::test]
async fn test_categories() {
    let app = setup_test_app();
    let token = signup(&app, "a@example.com").await;

    let (status, json) = send(&app, "GET", "/api/categories", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let defaults = json.as_array().unwrap().len();
    assert!(defaults > 0);

    let (status, created) = send(
        &app,
        "POST",
        "/api/categories",
        Some(&token),
        Some(json!({"name": "Pets"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Pets");

    let (_, json) = send(&app, "GET", "/api/categories", Some(&token), None).await;
    assert_eq!(json.as_array().unwrap().len(), defaults + 1);

    let (status, _) = send(
        &app,
        "POST",
        "/api/categories",
        Some(&token),
        Some(json!({"name": "pets"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ========== Transactions ==========

#[tokio::test]
async fn test_transaction_lifecycle() {
    let app = setup_test_app();
    let token = signup(&app, "a@example.com").await;
    let food = food_category(&app, &token).await;

    let (status, tx) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(json!({
            "category_id": food,
            "description": "  Bakery ",
            "amount": "12.30",
            "date": "2026-03-14",
            "kind": "expense"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["description"], "Bakery");
    assert_eq!(tx["recurrence"], "once");
    assert_eq!(money(&tx["amount"]), dec!(12.30));
    let id = tx["id"].as_i64().unwrap();

    send(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(json!({
            "category_id": food,
            "description": "Salary",
            "amount": "2500",
            "date": "2026-03-05",
            "kind": "income",
            "recurrence": "monthly"
        })),
    )
    .await;

    let (status, list) = send(&app, "GET", "/api/transactions", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(money(&list["total_income"]), dec!(2500));
    assert_eq!(money(&list["total_expense"]), dec!(12.30));
    assert_eq!(money(&list["balance"]), dec!(2487.70));

    let (_, filtered) = send(
        &app,
        "GET",
        "/api/transactions?kind=expense&from=2026-03-10&to=2026-03-31",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(filtered["transactions"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "GET",
        "/api/transactions?from=2026-04-01&to=2026-03-01",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/transactions/{}", id);
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_transaction_validation_and_ownership() {
    let app = setup_test_app();
    let owner = signup(&app, "a@example.com").await;
    let other = signup(&app, "b@example.com").await;
    let food = food_category(&app, &owner).await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(&owner),
        Some(json!({
            "category_id": food,
            "description": "Free lunch",
            "amount": "0",
            "date": "2026-03-14",
            "kind": "expense"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("greater than zero"));

    let (status, json) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(&owner),
        Some(json!({
            "category_id": food,
            "description": "Island",
            "amount": "39614081257132168796771975167",
            "date": "2026-03-14",
            "kind": "expense"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("at most"));

    let (_, tx) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(&owner),
        Some(json!({
            "category_id": food,
            "description": "Cinema",
            "amount": "30",
            "date": "2026-03-14",
            "kind": "expense"
        })),
    )
    .await;
    let uri = format!("/api/transactions/{}", tx["id"]);

    let (status, _) = send(&app, "DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, list) = send(&app, "GET", "/api/transactions", Some(&other), None).await;
    assert!(list["transactions"].as_array().unwrap().is_empty());
}

// ========== Budgets ==========

#[tokio::test]
async fn test_budget_lifecycle() {
    let app = setup_test_app();
    let token = signup(&app, "a@example.com").await;
    let food = food_category(&app, &token).await;

    let (status, budget) = send(
        &app,
        "POST",
        "/api/budgets",
        Some(&token),
        Some(json!({
            "year": 2026,
            "month": 3,
            "limit": "1500",
            "category_limits": [{"category_id": food, "limit": "400"}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(budget["year"], 2026);
    assert_eq!(budget["month"], 3);
    let id = budget["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/budgets",
        Some(&token),
        Some(json!({"year": 2026, "month": 3, "limit": "99"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(json!({
            "category_id": food,
            "description": "Groceries",
            "amount": "300",
            "date": "2026-03-02",
            "kind": "expense"
        })),
    )
    .await;

    let (status, status_json) = send(
        &app,
        "GET",
        "/api/budgets?year=2026&month=3",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&status_json["spent"]), dec!(300));
    assert_eq!(money(&status_json["usage_percent"]), dec!(20));
    assert_eq!(money(&status_json["categories"][0]["usage_percent"]), dec!(75));

    let uri = format!("/api/budgets/{}", id);
    let (status, updated) = send(&app, "PUT", &uri, Some(&token), Some(json!({"limit": "2000"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&updated["limit"]), dec!(2000));
    // Sub-limits survive an update that doesn't mention them
    assert_eq!(updated["category_limits"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "PUT", &uri, Some(&token), Some(json!({"limit": "0"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        "GET",
        "/api/budgets?year=2026&month=3",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_budget_invalid_month() {
    let app = setup_test_app();
    let token = signup(&app, "a@example.com").await;
    let (status, _) = send(
        &app,
        "GET",
        "/api/budgets?year=2026&month=13",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Risk & Dashboard ==========

#[tokio::test]
async fn test_risk_for_new_user_is_green() {
    let app = setup_test_app();
    let token = signup(&app, "a@example.com").await;

    let (status, risk) = send(&app, "GET", "/api/risk?date=2026-03-15", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(risk["level"], "GREEN");
    assert_eq!(money(&risk["projected_spend"]), Decimal::ZERO);
    assert!(risk["budget_usage"].is_null());
    assert_eq!(risk["year"], 2026);
    assert_eq!(risk["month"], 3);
}

#[tokio::test]
async fn test_risk_red_without_budget() {
    let app = setup_test_app();
    let token = signup(&app, "a@example.com").await;
    let food = food_category(&app, &token).await;
    send(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(json!({
            "category_id": food,
            "description": "Shoes",
            "amount": "80",
            "date": "2026-03-03",
            "kind": "expense"
        })),
    )
    .await;

    let (_, risk) = send(&app, "GET", "/api/risk?date=2026-03-15", Some(&token), None).await;
    assert_eq!(risk["level"], "RED");
    assert!(risk["budget_usage"].is_null());
    assert!(risk["message"].as_str().unwrap().contains("No budget defined"));
}

#[tokio::test]
async fn test_dashboard_overview_and_refresh() {
    let app = setup_test_app();
    let token = signup(&app, "a@example.com").await;
    let food = food_category(&app, &token).await;
    let today = Utc::now().date_naive();

    send(
        &app,
        "POST",
        "/api/budgets",
        Some(&token),
        Some(json!({"year": today.year(), "month": today.month(), "limit": "1000"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(json!({
            "category_id": food,
            "description": "Pharmacy",
            "amount": "100",
            "date": today.to_string(),
            "kind": "expense"
        })),
    )
    .await;

    let (status, overview) = send(&app, "GET", "/api/dashboard/overview", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&overview["total_expense"]), dec!(100));
    assert_eq!(money(&overview["total_usage_percent"]), dec!(10));
    assert!(overview["budget"].is_object());
    let first_id = overview["prediction"]["id"].as_i64().unwrap();

    let (status, refreshed) = send(
        &app,
        "POST",
        "/api/dashboard/refresh-prediction",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(refreshed["id"].as_i64().unwrap() > first_id);

    let (_, again) = send(&app, "GET", "/api/dashboard/overview", Some(&token), None).await;
    assert_eq!(again["prediction"]["id"], refreshed["id"]);

    let (_, history) = send(&app, "GET", "/api/dashboard/predictions", Some(&token), None).await;
    assert_eq!(history.as_array().unwrap().len(), 2);
}

// ========== Audit & Security ==========

#[tokio::test]
async fn test_audit_log_records_writes() {
    let app = setup_test_app();
    let token = signup(&app, "a@example.com").await;
    send(
        &app,
        "POST",
        "/api/categories",
        Some(&token),
        Some(json!({"name": "Gifts"})),
    )
    .await;

    let (status, entries) = send(&app, "GET", "/api/audit", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"register"));
    assert!(actions.contains(&"login"));
    assert!(actions.contains(&"create"));
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
}

#[test]
fn test_core_errors_map_to_status_codes() {
    use traevo_core::Error;

    let cases = [
        (Error::InvalidData("x".into()), StatusCode::BAD_REQUEST),
        (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
        (Error::Conflict("x".into()), StatusCode::CONFLICT),
        (Error::Auth("x".into()), StatusCode::UNAUTHORIZED),
        (Error::Encryption("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, expected) in cases {
        assert_eq!(AppError::from(err).status(), expected);
    }
}

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins(" https://a.example , ,https://b.example"),
        vec!["https://a.example", "https://b.example"]
    );
    assert!(parse_origins("").is_empty());
}
