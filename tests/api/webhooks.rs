use chrono::Utc;

use reqwest::StatusCode;

use serde_json::json;

use storefront::crypto::TIMESTAMP_TOLERANCE_SECONDS;
use storefront::model::Role;
use storefront::store::Store;

use crate::helpers::TestApp;

fn user_event(event_type: &str, id: &str, email: &str, first_name: &str) -> serde_json::Value {
    json!({
        "type": event_type,
        "object": "event",
        "data": {
            "id": id,
            "email_addresses": [{"id": "idn_1", "email_address": email}],
            "first_name": first_name,
            "last_name": "Lovelace",
            "image_url": "https://img.test/ada.png"
        }
    })
}

#[tokio::test]
async fn user_created_inserts_a_user_once() {
    let app = TestApp::spawn().await;
    let event = user_event("user.created", "user_ada", "ada@test.com", "Ada");

    for _ in 0..2 {
        let res = app.send_webhook(&event).await.expect("Failed to execute request");
        assert_eq!(StatusCode::OK, res.status());
    }

    let users = app.store.list_users().await.unwrap();
    assert_eq!(1, users.len());
    assert_eq!("user_ada", users[0].external_id);
    assert_eq!("ada@test.com", users[0].email);
    assert_eq!(Role::User, users[0].role);
    assert_eq!(Some("https://img.test/ada.png".to_string()), users[0].profile_image_url);
}

#[tokio::test]
async fn user_updated_changes_the_stored_profile() {
    let app = TestApp::spawn().await;
    app.send_webhook(&user_event("user.created", "user_ada", "ada@test.com", "Ada"))
        .await
        .unwrap();

    let res = app
        .send_webhook(&user_event("user.updated", "user_ada", "countess@test.com", "Augusta"))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let user = app.store.user_by_external_id("user_ada").await.unwrap().unwrap();
    assert_eq!("countess@test.com", user.email);
    assert_eq!(Some("Augusta".to_string()), user.first_name);
}

#[tokio::test]
async fn user_deleted_removes_the_user() {
    let app = TestApp::spawn().await;
    app.send_webhook(&user_event("user.created", "user_ada", "ada@test.com", "Ada"))
        .await
        .unwrap();

    let res = app
        .send_webhook(&json!({"type": "user.deleted", "data": {"id": "user_ada", "deleted": true}}))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    assert!(app.store.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn unhandled_events_are_acknowledged() {
    let app = TestApp::spawn().await;

    let res = app
        .send_webhook(&json!({"type": "session.created", "data": {"id": "sess_1"}}))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
}

#[tokio::test]
async fn bad_signatures_are_unauthorized_and_change_nothing() {
    let app = TestApp::spawn().await;
    let body = serde_json::to_vec(&user_event("user.created", "user_eve", "eve@test.com", "Eve")).unwrap();
    let now = Utc::now().timestamp();
    let stale = now - TIMESTAMP_TOLERANCE_SECONDS - 60;

    let test_cases = vec![
        ("Forged signature", now, "v1,Zm9yZ2VkLXNpZ25hdHVyZQ==".to_string()),
        ("Signature for other body", now, app.sign_webhook("msg_test", now, b"{}")),
        ("Stale timestamp", stale, app.sign_webhook("msg_test", stale, &body)),
    ];

    for (msg, timestamp, signature) in test_cases {
        let res = app
            .send_raw_webhook(body.clone(), "msg_test", timestamp, &signature)
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::UNAUTHORIZED, res.status(), "{}", msg);
    }

    assert!(app.store.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_headers_are_bad_requests() {
    let app = TestApp::spawn().await;

    let res = app
        .request(reqwest::Method::POST, "api/webhooks/identity")
        .json(&user_event("user.created", "user_ada", "ada@test.com", "Ada"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
}

#[tokio::test]
async fn malformed_payloads_are_bad_requests() {
    let app = TestApp::spawn().await;

    let test_cases = vec![
        ("No type", json!({"data": {}})),
        ("Created without id", json!({"type": "user.created", "data": {"first_name": "Ada"}})),
    ];

    for (msg, body) in test_cases {
        let res = app.send_webhook(&body).await.expect("Failed to execute request");
        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{}", msg);
    }
}
