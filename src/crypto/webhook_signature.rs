use actix_web::http::header::HeaderMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use chrono::{DateTime, Utc};

use hmac::{Hmac, Mac};

use secrecy::{ExposeSecret, Secret};

use sha2::Sha256;

const SECRET_PREFIX: &str = "whsec_";
const ID_HEADER: &str = "svix-id";
const TIMESTAMP_HEADER: &str = "svix-timestamp";
const SIGNATURE_HEADER: &str = "svix-signature";

/// How far a webhook timestamp may drift from the server clock
pub const TIMESTAMP_TOLERANCE_SECONDS: i64 = 5 * 60;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Missing {0} header")]
    MissingHeader(&'static str),
    #[error("Webhook timestamp is malformed")]
    InvalidTimestamp,
    #[error("Webhook timestamp is outside the tolerance window")]
    StaleTimestamp,
    #[error("Webhook signature does not match")]
    SignatureMismatch,
}

/// Signature headers sent with every identity-provider webhook
#[derive(Debug, Clone)]
pub struct WebhookHeaders {
    pub id: String,
    pub timestamp: i64,
    /// Space separated `v1,<base64>` entries
    pub signatures: String,
}

impl WebhookHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, WebhookError> {
        let get = |name: &'static str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .ok_or(WebhookError::MissingHeader(name))
        };

        let id = get(ID_HEADER)?;
        let timestamp = get(TIMESTAMP_HEADER)?
            .parse()
            .map_err(|_| WebhookError::InvalidTimestamp)?;
        let signatures = get(SIGNATURE_HEADER)?;

        Ok(Self {
            id,
            timestamp,
            signatures,
        })
    }
}

/// Verifies webhook payloads against the shared `whsec_` secret
#[derive(Clone)]
pub struct WebhookVerifier(Hmac<Sha256>);

impl WebhookVerifier {
    pub fn new(secret: &Secret<String>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let secret = secret.expose_secret();
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = BASE64
            .decode(encoded)
            .context("Failed to decode webhook secret")?;
        let hmac = Hmac::new_from_slice(&key)?;

        Ok(Self(hmac))
    }

    fn mac(&self, id: &str, timestamp: i64, body: &[u8]) -> Hmac<Sha256> {
        let mut mac = self.0.clone();
        mac.update(format!("{}.{}.", id, timestamp).as_bytes());
        mac.update(body);
        mac
    }

    /// Signature header value for a payload, in the same format the provider sends
    pub fn sign(&self, id: &str, timestamp: i64, body: &[u8]) -> String {
        let signature = self.mac(id, timestamp, body).finalize().into_bytes();
        format!("v1,{}", BASE64.encode(signature))
    }

    /// Check the timestamp window, then accept if any `v1` signature matches
    pub fn verify(
        &self,
        headers: &WebhookHeaders,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(), WebhookError> {
        if now.timestamp().abs_diff(headers.timestamp) > TIMESTAMP_TOLERANCE_SECONDS.unsigned_abs() {
            return Err(WebhookError::StaleTimestamp);
        }

        let matched = headers
            .signatures
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == "v1")
            .filter_map(|(_, signature)| BASE64.decode(signature).ok())
            .any(|signature| {
                self.mac(&headers.id, headers.timestamp, body)
                    .verify_slice(&signature)
                    .is_ok()
            });

        if matched {
            Ok(())
        } else {
            Err(WebhookError::SignatureMismatch)
        }
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookVerifier([REDACTED])")
    }
}
