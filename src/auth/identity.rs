use std::sync::Arc;

use actix_web::http::header::{self, HeaderMap};

use anyhow::Context;

use async_trait::async_trait;

use crate::crypto::{verify_session_token, SigningKey};
use crate::model::Role;
use crate::store::Store;

const BEARER_AUTH_PREFIX: &str = "Bearer ";

/// A signed-in identity-provider user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// ID of the user at the identity provider
    pub external_id: String,
}

/// Resolves the caller of a request to an identity-provider user
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if the request carries a valid session
    fn current_user(&self, headers: &HeaderMap) -> Option<Identity>;
    /// Role of a signed-in user
    async fn role(&self, identity: &Identity) -> anyhow::Result<Role>;
}

/// Identity provider backed by HMAC-signed session tokens.
///
/// Roles come from the local user table, which webhooks keep in sync.
pub struct SessionIdentityProvider {
    key: SigningKey,
    store: Arc<dyn Store>,
}

impl SessionIdentityProvider {
    pub fn new(key: SigningKey, store: Arc<dyn Store>) -> Self {
        Self { key, store }
    }

    /// Extract the session token from an 'Authorization: Bearer <token>' header
    fn bearer_token(headers: &HeaderMap) -> anyhow::Result<&str> {
        headers
            .get(header::AUTHORIZATION)
            .context("Missing authorization in header")?
            .to_str()?
            .strip_prefix(BEARER_AUTH_PREFIX)
            .context("Authorization scheme not bearer")
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentityProvider {
    fn current_user(&self, headers: &HeaderMap) -> Option<Identity> {
        let token = match Self::bearer_token(headers) {
            Ok(token) => token,
            Err(error) => {
                tracing::debug!(error.cause_chain = ?error, "No session on request");
                return None;
            }
        };

        match verify_session_token(&self.key, token) {
            Ok(external_id) => Some(Identity { external_id }),
            Err(error) => {
                tracing::warn!(error.cause_chain = ?error, "Rejected session token");
                None
            }
        }
    }

    #[tracing::instrument(name = "Look up user role", skip(self))]
    async fn role(&self, identity: &Identity) -> anyhow::Result<Role> {
        let user = self
            .store
            .user_by_external_id(&identity.external_id)
            .await
            .context("Failed to look up user role")?;

        Ok(user.map(|user| user.role).unwrap_or(Role::User))
    }
}
