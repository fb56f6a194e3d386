use std::time::Duration;

use claims::{assert_matches, assert_none, assert_ok, assert_ok_eq, assert_some};

use reqwest::StatusCode;

use rust_decimal::Decimal;

use storefront::cart::{CartStore, FileStorage, MemoryStorage};
use storefront::catalog::Catalog;
use storefront::checkout::{CheckoutError, CheckoutFlow, CheckoutStep};
use storefront::client::ApiClientError;
use storefront::domain::{CustomerInfoForm, PaymentForm};
use storefront::store::Store;

use crate::helpers::TestApp;

fn tax_rate() -> Decimal {
    Decimal::new(6, 2)
}

fn customer_form() -> CustomerInfoForm {
    CustomerInfoForm {
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        email: Some("ada@test.com".into()),
        phone: Some("020 7946 0958".into()),
    }
}

fn card_form() -> PaymentForm {
    PaymentForm {
        payment_method: Some("creditCard".into()),
        card_number: Some("4242 4242 4242 4242".into()),
        expiry_date: Some("12/30".into()),
        cvv: Some("123".into()),
        name_on_card: Some("Ada Lovelace".into()),
        address: Some("12 St James's Square".into()),
        city: Some("London".into()),
        zip_code: Some("SW1Y 4JH".into()),
        state: Some("London".into()),
        country: Some("UK".into()),
    }
}

#[tokio::test]
async fn cart_to_confirmation() {
    let app = TestApp::spawn().await;
    app.mock_payment_gateway().await;
    let client = app.storefront_client();

    let catalog = Catalog::load(&client).await;
    let mut cart = CartStore::load(MemoryStorage::new(), tax_rate());
    let mut flow = CheckoutFlow::new();

    cart.add_to_cart(1);
    cart.add_to_cart(2);

    assert_eq!(CheckoutStep::Information, flow.begin(&cart));
    assert_ok_eq!(flow.submit_information(&mut cart, customer_form()), CheckoutStep::Review);
    assert_ok_eq!(flow.continue_to_payment(&cart), CheckoutStep::Payment);

    let placed = assert_ok!(
        flow.submit_payment(&mut cart, &catalog, &client, card_form())
            .await
    );
    assert_eq!(CheckoutStep::Confirmation, flow.current());
    assert_eq!(
        Some("**** **** **** 4242"),
        cart.payment_info().and_then(|info| info.masked_card.as_deref())
    );

    let summary = flow
        .confirmation(&cart, &catalog)
        .expect("Confirmation summary missing");
    assert_eq!(Some(placed.order_number.clone()), summary.order_number);
    assert_eq!(Decimal::new(37100, 2), summary.totals.total);

    assert_ok!(flow.finish(&mut cart, Duration::from_millis(10)).await);
    assert!(cart.is_empty());
    assert_eq!(CheckoutStep::Cart, flow.current());
    assert_none!(flow.placed_order());
    assert_none!(cart.customer_info());
    assert_none!(cart.payment_info());

    let order = app
        .store
        .order_by_number(&placed.order_number)
        .await
        .unwrap()
        .expect("Order was not stored");
    assert_eq!(Decimal::new(37100, 2), order.total);
    assert_eq!("ada@test.com", order.customer_email);
}

#[tokio::test]
async fn invalid_payment_details_submit_nothing() {
    let app = TestApp::spawn().await;
    let client = app.storefront_client();
    let catalog = Catalog::load(&client).await;
    let mut cart = CartStore::load(MemoryStorage::new(), tax_rate());
    let mut flow = CheckoutFlow::new();

    cart.add_to_cart(1);
    flow.begin(&cart);
    flow.submit_information(&mut cart, customer_form()).unwrap();
    flow.continue_to_payment(&cart).unwrap();

    let form = PaymentForm {
        card_number: Some("1234".into()),
        cvv: Some("1".into()),
        ..card_form()
    };
    let res = flow.submit_payment(&mut cart, &catalog, &client, form).await;

    let errors = match res {
        Err(CheckoutError::Validation(errors)) => errors,
        other => panic!("Expected validation errors, got {:?}", other),
    };
    assert!(errors.contains("cardNumber"));
    assert!(errors.contains("cvv"));
    assert_eq!(CheckoutStep::Payment, flow.current());
    assert!(app.store.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn paying_before_information_redirects() {
    let app = TestApp::spawn().await;
    let client = app.storefront_client();
    let catalog = Catalog::load(&client).await;
    let mut cart = CartStore::load(MemoryStorage::new(), tax_rate());
    let mut flow = CheckoutFlow::new();
    cart.add_to_cart(1);

    let res = flow.submit_payment(&mut cart, &catalog, &client, card_form()).await;

    assert_matches!(res, Err(CheckoutError::Redirected(CheckoutStep::Information)));
    assert!(app.store.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn server_rejection_keeps_the_cart() {
    let app = TestApp::spawn().await;
    let client = app.storefront_client();

    // A stale client catalog pricing a course the server no longer sells
    let mut courses = Catalog::fallback().courses().to_vec();
    courses[0].id = 99;
    let catalog = Catalog::new(courses);

    let mut cart = CartStore::load(MemoryStorage::new(), tax_rate());
    let mut flow = CheckoutFlow::new();
    cart.add_to_cart(99);
    flow.begin(&cart);
    flow.submit_information(&mut cart, customer_form()).unwrap();
    flow.continue_to_payment(&cart).unwrap();

    let res = flow.submit_payment(&mut cart, &catalog, &client, card_form()).await;

    assert_matches!(
        res,
        Err(CheckoutError::Submission(ApiClientError::Status {
            status: StatusCode::BAD_REQUEST,
            ..
        }))
    );
    assert_eq!(CheckoutStep::Payment, flow.current());
    assert!(cart.is_item_in_cart(99));
    assert_some!(cart.customer_info());
}

#[tokio::test]
async fn cart_survives_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    let mut cart = CartStore::load(FileStorage::new(dir.path()), tax_rate());
    cart.add_to_cart(2);
    cart.add_to_cart(2);
    drop(cart);

    let cart = CartStore::load(FileStorage::new(dir.path()), tax_rate());
    assert_eq!(2, cart.cart_item_count());
    assert!(cart.is_item_in_cart(2));
}
