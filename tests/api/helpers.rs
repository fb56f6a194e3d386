use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;

use chrono::Utc;

use reqwest::{Client, Method, Response};

use rust_decimal::Decimal;

use secrecy::Secret;

use serde_json::json;

use url::Url;

use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront::app::{self, AppContext};
use storefront::auth::SessionIdentityProvider;
use storefront::client::{EmailClient, PaymentClient, StorefrontClient};
use storefront::controller::contact::ContactRecipient;
use storefront::crypto::{issue_session_token, SigningKey, WebhookVerifier};
use storefront::model::{NewUser, Role, User};
use storefront::settings::CheckoutSettings;
use storefront::store::{MemoryStore, Store};
use storefront::telemetry;

pub const CONTACT_RECIPIENT: &str = "owner@test.com";

lazy_static::lazy_static! {
    // Set TEST_LOG to see tracing output from the app under test
    static ref TRACING: () = {
        let filter = "debug".to_string();
        if std::env::var("TEST_LOG").is_ok() {
            let subscriber = telemetry::create_subscriber(filter, std::io::stdout);
            telemetry::set_subscriber(subscriber).expect("Failed to set subscriber");
        } else {
            let subscriber = telemetry::create_subscriber(filter, std::io::sink);
            telemetry::set_subscriber(subscriber).expect("Failed to set subscriber");
        }
    };
}

pub struct TestApp {
    addr: String,

    pub client: Client,
    pub store: Arc<MemoryStore>,
    pub email_server: MockServer,
    pub payment_server: MockServer,

    signing_key: SigningKey,
    webhook_verifier: WebhookVerifier,
}

impl TestApp {
    pub async fn spawn() -> Self {
        lazy_static::initialize(&TRACING);

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryStore::with_sample_catalog());

        let signing_key = SigningKey::new(&Secret::new("test-session-secret".into()))
            .expect("Failed to create crypto signing key");

        let webhook_verifier = {
            let key = base64::engine::general_purpose::STANDARD.encode("test-webhook-secret");
            WebhookVerifier::new(&Secret::new(format!("whsec_{}", key)))
                .expect("Failed to create webhook verifier")
        };

        let email_server = MockServer::start().await;
        let payment_server = MockServer::start().await;

        let email_client = {
            let sender = "test@test.com"
                .parse()
                .expect("Failed to parse sender email address");
            let api_base_url =
                Url::parse(&email_server.uri()).expect("Failed to parse mock server uri");
            let api_auth_token = Secret::new("TestAuthorization".to_string());
            let api_timeout = Duration::from_secs(2);

            EmailClient::new(sender, api_timeout, api_base_url, api_auth_token.into())
                .expect("Failed to create email client")
        };

        let payment_client = PaymentClient::new(
            Url::parse(&payment_server.uri()).expect("Failed to parse mock server uri"),
            Secret::new("sk_test_storefront".into()),
            "gbp".into(),
            Duration::from_secs(2),
        )
        .expect("Failed to create payment client");

        let ctx = AppContext {
            store: store.clone(),
            identity: Arc::new(SessionIdentityProvider::new(
                signing_key.clone(),
                store.clone(),
            )),
            email_client,
            payment_client,
            webhook_verifier: webhook_verifier.clone(),
            contact_recipient: ContactRecipient(CONTACT_RECIPIENT.parse().unwrap()),
            checkout: CheckoutSettings {
                tax_rate: Decimal::new(6, 2),
                order_number_prefix: "HBH".into(),
            },
        };

        let server = app::run(listener, ctx).expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self {
            addr,
            client,
            store,
            email_server,
            payment_server,
            signing_key,
            webhook_verifier,
        }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub fn authorized_request(
        &self,
        method: Method,
        url: &str,
        session: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let req = self.request(method, url);
        if let Some(token) = session {
            req.bearer_auth(token)
        } else {
            req
        }
    }

    /// Client-side API client pointed at this app
    pub fn storefront_client(&self) -> StorefrontClient {
        StorefrontClient::new(Url::parse(&self.addr).unwrap(), Duration::from_secs(5))
            .expect("Failed to create storefront client")
    }

    /// Session token for an identity-provider user
    pub fn session_for(&self, external_id: &str) -> String {
        issue_session_token(&self.signing_key, external_id, chrono::Duration::minutes(5))
            .expect("Failed to sign session token")
    }

    pub async fn insert_user(&self, external_id: &str, role: Role) -> User {
        self.store
            .insert_user(NewUser {
                external_id: external_id.into(),
                email: format!("{}@test.com", external_id),
                first_name: Some("Test".into()),
                last_name: Some("User".into()),
                profile_image_url: None,
                role,
            })
            .await
            .expect("Failed to insert test user")
    }

    /// Token for a freshly inserted admin
    pub async fn admin_session(&self) -> String {
        self.insert_user("user_admin", Role::Admin).await;
        self.session_for("user_admin")
    }

    /// Make the payment gateway accept every payment intent request
    pub async fn mock_payment_gateway(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_test",
                "client_secret": "pi_test_secret",
                "status": "requires_payment_method"
            })))
            .mount(&self.payment_server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex("^/v1/payment_intents/.+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_test",
                "client_secret": "pi_test_secret",
                "status": "succeeded"
            })))
            .mount(&self.payment_server)
            .await;
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn get(&self, url: &str) -> reqwest::Result<Response> {
        self.request(Method::GET, url).send().await
    }

    pub async fn submit_order(&self, body: &serde_json::Value) -> reqwest::Result<Response> {
        self.request(Method::POST, "api/orders")
            .json(body)
            .send()
            .await
    }

    pub async fn submit_contact(&self, body: &serde_json::Value) -> reqwest::Result<Response> {
        self.request(Method::POST, "api/contact")
            .json(body)
            .send()
            .await
    }

    /// Post a webhook payload signed the way the identity provider signs them
    pub async fn send_webhook(&self, body: &serde_json::Value) -> reqwest::Result<Response> {
        let body = serde_json::to_vec(body).unwrap();
        let timestamp = Utc::now().timestamp();
        let signature = self.webhook_verifier.sign("msg_test", timestamp, &body);

        self.send_raw_webhook(body, "msg_test", timestamp, &signature)
            .await
    }

    pub async fn send_raw_webhook(
        &self,
        body: Vec<u8>,
        id: &str,
        timestamp: i64,
        signature: &str,
    ) -> reqwest::Result<Response> {
        self.request(Method::POST, "api/webhooks/identity")
            .header("svix-id", id)
            .header("svix-timestamp", timestamp.to_string())
            .header("svix-signature", signature)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
    }

    pub fn sign_webhook(&self, id: &str, timestamp: i64, body: &[u8]) -> String {
        self.webhook_verifier.sign(id, timestamp, body)
    }
}

/// A valid order body for the given course ids and totals
pub fn order_body(items: &[i32], subtotal: &str, tax: &str, total: &str) -> serde_json::Value {
    json!({
        "items": items,
        "customerInfo": {
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@test.com",
            "phone": "020 7946 0958"
        },
        "subtotal": subtotal,
        "tax": tax,
        "total": total
    })
}
