//! Premium purchase flow

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{create_test_server, login, signup, TestContext};

async fn create_intent(ctx: &TestContext, amount: f64, plan: &str) -> String {
    let response = ctx
        .server
        .post("/api/payment/create-intent")
        .json(&json!({"amount": amount, "plan": plan}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["clientSecret"].is_string());
    body["paymentIntentId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn payment_endpoints_require_login() {
    let ctx = create_test_server();

    ctx.server
        .post("/api/payment/create-intent")
        .json(&json!({"amount": 10.0, "plan": "monthly"}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    ctx.server
        .get("/api/payment/receipt")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_purchase_grants_premium() {
    let ctx = create_test_server();
    signup(&ctx.server, "asha@x.com", "pw12", false).await;
    login(&ctx.server, "asha@x.com", "pw12").await;

    let intent_id = create_intent(&ctx, 9.99, "monthly").await;

    // Confirming before the cardholder pays is rejected
    let response = ctx
        .server
        .post("/api/payment/confirm")
        .json(&json!({"paymentIntentId": intent_id, "amount": 9.99, "plan": "monthly"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "payment_not_confirmed");

    assert!(ctx.processor.complete(&intent_id));

    let response = ctx
        .server
        .post("/api/payment/confirm")
        .json(&json!({"paymentIntentId": intent_id, "amount": 9.99, "plan": "monthly"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["isPremium"], true);
    assert_eq!(body["receipt"]["transactionId"], intent_id.as_str());
    assert_eq!(body["receipt"]["subscriptionPlan"], "Monthly Premium Plan");
    assert_eq!(body["receipt"]["paymentStatus"], "Completed");

    // Receipt and subscription are now queryable
    let response = ctx.server.get("/api/payment/receipt").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["receipt"]["transactionId"],
        intent_id.as_str()
    );

    let response = ctx.server.get("/api/payment/subscription").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["subscription"], "Monthly Premium Plan");
    assert!(body["expiryDate"].is_string());

    // Profile now reports premium
    let response = ctx.server.get("/api/profile").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["isPremium"], true);
}

#[tokio::test]
async fn premium_member_is_blocked_before_processor_contact() {
    let ctx = create_test_server();
    signup(&ctx.server, "asha@x.com", "pw12", false).await;
    login(&ctx.server, "asha@x.com", "pw12").await;

    let intent_id = create_intent(&ctx, 99.99, "annual").await;
    ctx.processor.complete(&intent_id);

    ctx.server
        .post("/api/payment/confirm")
        .json(&json!({"paymentIntentId": intent_id, "amount": 99.99, "plan": "annual"}))
        .await
        .assert_status_ok();
    let retrieves_after_first = ctx.processor.retrieve_calls();

    // A second confirmation fails on the premium check, without another
    // processor round trip
    let second = create_intent(&ctx, 9.99, "monthly").await;
    ctx.processor.complete(&second);

    let response = ctx
        .server
        .post("/api/payment/confirm")
        .json(&json!({"paymentIntentId": second, "amount": 9.99, "plan": "monthly"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "already_premium");
    assert_eq!(ctx.processor.retrieve_calls(), retrieves_after_first);
}

#[tokio::test]
async fn replayed_transaction_id_conflicts() {
    let ctx = create_test_server();
    signup(&ctx.server, "asha@x.com", "pw12", false).await;
    login(&ctx.server, "asha@x.com", "pw12").await;

    let intent_id = create_intent(&ctx, 9.99, "monthly").await;
    ctx.processor.complete(&intent_id);

    ctx.server
        .post("/api/payment/confirm")
        .json(&json!({"paymentIntentId": intent_id, "amount": 9.99, "plan": "monthly"}))
        .await
        .assert_status_ok();

    // A different account replaying the same transaction id hits the
    // unique receipt constraint
    ctx.server.post("/api/auth/logout").await.assert_status_ok();
    signup(&ctx.server, "ravi@x.com", "pw12", false).await;
    login(&ctx.server, "ravi@x.com", "pw12").await;

    let response = ctx
        .server
        .post("/api/payment/confirm")
        .json(&json!({"paymentIntentId": intent_id, "amount": 9.99, "plan": "monthly"}))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "duplicate_transaction");
}

#[tokio::test]
async fn confirm_validates_input() {
    let ctx = create_test_server();
    signup(&ctx.server, "asha@x.com", "pw12", false).await;
    login(&ctx.server, "asha@x.com", "pw12").await;

    let response = ctx
        .server
        .post("/api/payment/confirm")
        .json(&json!({"amount": 9.99, "plan": "monthly"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Payment intent ID is required"
    );

    let response = ctx
        .server
        .post("/api/payment/create-intent")
        .json(&json!({"amount": 9.99, "plan": "weekly"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Invalid plan");

    let response = ctx
        .server
        .post("/api/payment/create-intent")
        .json(&json!({"amount": -5.0, "plan": "monthly"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = ctx.server.get("/api/payment/receipt").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "No receipt found");

    let response = ctx.server.get("/api/payment/subscription").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["message"],
        "No active subscription"
    );
}
