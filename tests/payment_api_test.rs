use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use payment_simulator::adapters::{InMemoryResponseCache, InMemoryTransactionRepository};
use payment_simulator::config::AdminCredentials;
use payment_simulator::domain::CardValidator;
use payment_simulator::middleware::auth::basic_header;
use payment_simulator::services::PaymentService;
use payment_simulator::simulation::{FixedSimulator, SystemClock};
use payment_simulator::{create_app, AppState};

const TEST_CARD: &str = "4111111111111111";

fn payment_service() -> PaymentService {
    PaymentService::new(
        Arc::new(InMemoryTransactionRepository::new()),
        Arc::new(InMemoryResponseCache::new()),
        CardValidator::new([TEST_CARD.to_string()].into_iter().collect()),
        Arc::new(FixedSimulator::approving()),
        Arc::new(SystemClock),
    )
}

fn admin() -> AdminCredentials {
    AdminCredentials {
        username: "admin".to_string(),
        password: "letmein".to_string(),
    }
}

fn test_app() -> Router {
    create_app(AppState {
        admin_credentials: Some(admin()),
        ..AppState::new(payment_service())
    })
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn authorize_body(card: &str) -> Value {
    json!({
        "cardNumber": card,
        "cardExpiry": "12/99",
        "cvv": "123",
        "amount": "10.00"
    })
}

#[tokio::test]
async fn test_full_payment_lifecycle() {
    let app = test_app();

    let (status, authorized) = send(
        &app,
        post_json("/api/payments/authorize", authorize_body(TEST_CARD)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(authorized["status"], "AUTHORIZED");
    assert_eq!(authorized["type"], "AUTHORIZE");
    assert_eq!(authorized["maskedCardNumber"], "**** **** **** 1111");
    assert_eq!(authorized["amount"], "10.00");
    assert_eq!(authorized["responseCode"], "00");
    assert_eq!(authorized["authorizationCode"], "123456");
    assert!(!authorized.to_string().contains(TEST_CARD));

    let transaction_id = authorized["transactionId"].as_str().unwrap().to_string();

    let (status, captured) = send(
        &app,
        post_json(
            "/api/payments/capture",
            json!({ "transactionId": transaction_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(captured["status"], "CAPTURED");
    assert_eq!(captured["type"], "CAPTURE");
    assert_eq!(captured["responseMessage"], "Captured");

    let (status, refunded) = send(
        &app,
        post_json(
            "/api/payments/refund",
            json!({ "transactionId": transaction_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refunded["status"], "REFUNDED");
    assert_eq!(refunded["responseMessage"], "Refunded");
    assert_eq!(refunded["authorizationCode"], "123456");

    let (status, error) = send(
        &app,
        post_json(
            "/api/payments/refund",
            json!({ "transactionId": transaction_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["status"], 409);

    let uri = format!("/api/payments/{}", authorized["id"]);
    let (status, fetched) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "REFUNDED");
}

#[tokio::test]
async fn test_unknown_card_is_recorded_as_declined() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post_json("/api/payments/authorize", authorize_body("5555555555554444")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "DECLINED");
    assert_eq!(body["responseCode"], "INVALID_CARD");
    assert_eq!(body["responseMessage"], "Invalid card number");
    assert!(body["authorizationCode"].is_null());
    assert_eq!(body["maskedCardNumber"], "**** **** **** 4444");
}

#[tokio::test]
async fn test_malformed_authorize_request_is_rejected() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/payments/authorize",
            json!({
                "cardNumber": "4111-1111",
                "cardExpiry": "12/99",
                "cvv": "123",
                "amount": "10.00"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, _) = send(
        &app,
        post_json("/api/payments/capture", json!({ "transactionId": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, history) = send(&app, get("/api/payments/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_transactions_return_not_found() {
    let app = test_app();

    let (status, _) = send(&app, get("/api/payments/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        post_json(
            "/api/payments/capture",
            json!({ "transactionId": "no-such-transaction" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found: Transaction no-such-transaction not found");
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let app = test_app();

    for _ in 0..3 {
        send(
            &app,
            post_json("/api/payments/authorize", authorize_body(TEST_CARD)),
        )
        .await;
    }

    let (status, history) = send(&app, get("/api/payments/history")).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<i64> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_admin_cache_clear_requires_basic_auth() {
    let app = test_app();

    let (status, _) = send(&app, post_json("/admin/cache/clear", json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = AdminCredentials {
        username: "admin".to_string(),
        password: "wrong".to_string(),
    };
    let req = Request::builder()
        .method("POST")
        .uri("/admin/cache/clear")
        .header(header::AUTHORIZATION, basic_header(&wrong))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

    let req = Request::builder()
        .method("POST")
        .uri("/admin/cache/clear")
        .header(header::AUTHORIZATION, basic_header(&admin()))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cache cleared successfully");
}

#[tokio::test]
async fn test_admin_disabled_without_password() {
    let app = create_app(AppState::new(payment_service()));

    let req = Request::builder()
        .method("POST")
        .uri("/admin/cache/clear")
        .header(header::AUTHORIZATION, basic_header(&admin()))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = test_app();

    let (status, health) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["store"], "connected");

    let (status, doc) = send(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/payments/authorize"].is_object());
    assert!(doc["paths"]["/admin/cache/clear"].is_object());
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = create_app(AppState {
        log_request_body: true,
        ..AppState::new(payment_service())
    });

    let response = app
        .oneshot(post_json("/api/payments/authorize", authorize_body(TEST_CARD)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let request_id = response.headers().get("x-request-id").unwrap();
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_missing_or_null_fields_are_validation_errors() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/payments/authorize",
            json!({
                "cardNumber": TEST_CARD,
                "cardExpiry": "12/99",
                "cvv": "123"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Validation error: amount: must not be null");

    let (status, body) = send(
        &app,
        post_json("/api/payments/capture", json!({ "transactionId": null })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(
        body["error"],
        "Validation error: transactionId: must not be null"
    );

    let req = Request::builder()
        .method("POST")
        .uri("/api/payments/refund")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_sub_cent_amount_is_rejected() {
    let app = test_app();

    let mut request = authorize_body(TEST_CARD);
    request["amount"] = json!("10.005");
    let (status, body) = send(&app, post_json("/api/payments/authorize", request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Validation error: amount: Amount must have at most 2 decimal places"
    );
}

#[tokio::test]
async fn test_body_logging_does_not_reject_large_requests() {
    let app = create_app(AppState {
        log_request_body: true,
        ..AppState::new(payment_service())
    });

    let mut request = authorize_body(TEST_CARD);
    request["note"] = json!("x".repeat(8 * 1024));
    let (status, body) = send(&app, post_json("/api/payments/authorize", request)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "AUTHORIZED");
}
