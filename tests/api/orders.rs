use reqwest::StatusCode;

use rust_decimal::Decimal;

use serde_json::json;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use storefront::model::{NewCourse, OrderDetails, PlacedOrder, Role};
use storefront::store::Store;

use crate::helpers::{order_body, TestApp};

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

async fn add_course(app: &TestApp, price: &str) -> i32 {
    app.store
        .create_course(NewCourse {
            title: "Test course".into(),
            description: "A course created for testing".into(),
            price: dec(price),
            image_url: "https://example.com/course.jpg".into(),
            duration: "Length: 60 minutes".into(),
            instructor: "Test Instructor".into(),
            start_date: None,
            end_date: None,
            day_of_week: None,
            start_time: None,
            time_zone: None,
        })
        .await
        .expect("Failed to create course")
        .id
}

#[tokio::test]
async fn valid_order_is_persisted_with_payment_intent() {
    let app = TestApp::spawn().await;
    app.mock_payment_gateway().await;

    let res = app
        .submit_order(&order_body(&[1, 2], "350.00", "21.00", "371.00"))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let placed: PlacedOrder = res.json().await.expect("Failed to parse placed order");
    assert!(placed.order_number.starts_with("HBH-"));
    assert_eq!(Some("pi_test_secret".to_string()), placed.payment_client_handle);

    let order = app
        .store
        .order_by_number(&placed.order_number)
        .await
        .unwrap()
        .expect("Order was not stored");
    assert_eq!(placed.order_id, order.id);
    assert_eq!(dec("371.00"), order.total);
    assert_eq!(Some("pi_test".to_string()), order.payment_intent_id);
    assert_eq!(None, order.user_id);
    assert_eq!(2, app.store.order_items(order.id).await.unwrap().len());
}

#[tokio::test]
async fn totals_are_computed_at_six_percent() {
    let app = TestApp::spawn().await;
    let hundred = add_course(&app, "100.00").await;
    let sixty = add_course(&app, "60.00").await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(body_string_contains("amount=16960"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_1696",
            "client_secret": "pi_1696_secret",
            "status": "requires_payment_method"
        })))
        .expect(1)
        .mount(&app.payment_server)
        .await;

    let res = app
        .submit_order(&order_body(&[hundred, sixty], "160.00", "9.60", "169.60"))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let orders = app.store.list_orders().await.unwrap();
    assert_eq!(1, orders.len());
    assert_eq!(dec("160.00"), orders[0].subtotal);
    assert_eq!(dec("9.60"), orders[0].tax);
    assert_eq!(dec("169.60"), orders[0].total);
}

#[tokio::test]
async fn each_submitted_id_becomes_an_item_priced_from_the_catalog() {
    let app = TestApp::spawn().await;
    app.mock_payment_gateway().await;

    let res = app
        .submit_order(&order_body(&[1, 1], "350.00", "21.00", "371.00"))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let placed: PlacedOrder = res.json().await.unwrap();
    let items = app.store.order_items(placed.order_id).await.unwrap();
    assert_eq!(2, items.len());
    assert!(items
        .iter()
        .all(|item| item.course_id == 1 && item.price == dec("175.00")));
}

#[tokio::test]
async fn mismatching_totals_are_rejected() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.payment_server)
        .await;

    let res = app
        .submit_order(&order_body(&[1], "1.00", "0.06", "1.06"))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    let body: serde_json::Value = res.json().await.unwrap();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|error| error["field"].as_str())
        .collect();
    assert!(fields.contains(&"subtotal"));
    assert!(fields.contains(&"total"));

    assert!(app.store.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_courses_are_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .submit_order(&order_body(&[1, 404], "175.00", "10.50", "185.50"))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    assert!(app.store.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_orders_are_rejected() {
    let app = TestApp::spawn().await;

    let mut missing_customer = order_body(&[1], "175.00", "10.50", "185.50");
    missing_customer.as_object_mut().unwrap().remove("customerInfo");
    let mut bad_email = order_body(&[1], "175.00", "10.50", "185.50");
    bad_email["customerInfo"]["email"] = json!("not-an-email");
    let mut missing_total = order_body(&[1], "175.00", "10.50", "185.50");
    missing_total.as_object_mut().unwrap().remove("total");

    let test_cases = vec![
        ("Empty cart", order_body(&[], "0", "0", "0"), "items"),
        ("Missing customer", missing_customer, "customerInfo"),
        ("Invalid email", bad_email, "customerInfo.email"),
        ("Missing total", missing_total, "total"),
    ];

    for (msg, body, field) in test_cases {
        let res = app
            .submit_order(&body)
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{}", msg);

        let body: serde_json::Value = res.json().await.unwrap();
        let has_field = body["errors"]
            .as_array()
            .map(|errors| errors.iter().any(|error| error["field"] == field))
            .unwrap_or(false);
        assert!(has_field, "{}: no error for {}", msg, field);
    }
}

#[tokio::test]
async fn malformed_json_gets_a_json_error() {
    let app = TestApp::spawn().await;

    let res = app
        .request(reqwest::Method::POST, "api/orders")
        .header("Content-Type", "application/json")
        .body("{\"items\": [1,")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: serde_json::Value = res.json().await.expect("Error body was not JSON");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn gateway_failure_persists_nothing() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.payment_server)
        .await;

    let res = app
        .submit_order(&order_body(&[1], "175.00", "10.50", "185.50"))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    assert!(app.store.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn signed_in_orders_belong_to_the_user() {
    let app = TestApp::spawn().await;
    app.mock_payment_gateway().await;
    let user = app.insert_user("user_buyer", Role::User).await;
    let session = app.session_for("user_buyer");

    let res = app
        .authorized_request(reqwest::Method::POST, "api/orders", Some(&session))
        .json(&order_body(&[2], "175.00", "10.50", "185.50"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let orders = app.store.list_orders().await.unwrap();
    assert_eq!(Some(user.id), orders[0].user_id);
}

#[tokio::test]
async fn placed_orders_can_be_looked_up() {
    let app = TestApp::spawn().await;
    app.mock_payment_gateway().await;

    let placed: PlacedOrder = app
        .submit_order(&order_body(&[1], "175.00", "10.50", "185.50"))
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    let res = app
        .get(&format!("api/orders/{}", placed.order_number))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let details: OrderDetails = res.json().await.expect("Failed to parse order");
    assert_eq!(placed.order_id, details.order.id);
    assert_eq!(1, details.items.len());
    assert_eq!(Some("succeeded".to_string()), details.payment_status);

    let res = app
        .get("api/orders/HBH-NOTREAL")
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::NOT_FOUND, res.status());
}
