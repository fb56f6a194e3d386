mod session_token;
mod signing_key;
mod webhook_signature;

pub use session_token::{issue_session_token, verify_session_token, TokenError, TokenResult};
pub use signing_key::SigningKey;
pub use webhook_signature::{
    WebhookError, WebhookHeaders, WebhookVerifier, TIMESTAMP_TOLERANCE_SECONDS,
};
