use std::time::Duration;

use reqwest::StatusCode;

use serde_json::json;

use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront::model::ContactReceipt;
use storefront::store::Store;

use crate::helpers::{TestApp, CONTACT_RECIPIENT};

fn contact_body() -> serde_json::Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@test.com",
        "subject": "Seminar dates",
        "message": "When does the next seminar start?"
    })
}

/// Wait for the background relay to reach the email server
async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<wiremock::Request> {
    for _ in 0..50 {
        let requests = server.received_requests().await.unwrap_or_default();
        if requests.len() >= count {
            return requests;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    server.received_requests().await.unwrap_or_default()
}

#[tokio::test]
async fn contact_is_stored_and_relayed() {
    let app = TestApp::spawn().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .submit_contact(&contact_body())
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let receipt: ContactReceipt = res.json().await.expect("Failed to parse receipt");
    let contacts = app.store.list_contacts().await.unwrap();
    assert_eq!(1, contacts.len());
    assert_eq!(receipt.contact_id, contacts[0].id);

    let requests = wait_for_requests(&app.email_server, 1).await;
    let email: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(CONTACT_RECIPIENT, email["To"]);
    assert_eq!("ada@test.com", email["ReplyTo"]);
}

#[tokio::test]
async fn contact_succeeds_when_email_fails() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.email_server)
        .await;

    let res = app
        .submit_contact(&contact_body())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());
    assert_eq!(1, app.store.list_contacts().await.unwrap().len());
}

#[tokio::test]
async fn invalid_contacts_are_rejected_and_not_stored() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = vec![
        ("Missing name", "name", json!(null)),
        ("Invalid email", "email", json!("ada-at-test")),
        ("Empty subject", "subject", json!("  ")),
        ("Missing message", "message", json!(null)),
    ];

    for (msg, field, value) in test_cases {
        let mut body = contact_body();
        body[field] = value;

        let res = app
            .submit_contact(&body)
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{}", msg);

        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(field, body["errors"][0]["field"], "{}", msg);
    }

    assert!(app.store.list_contacts().await.unwrap().is_empty());
}
