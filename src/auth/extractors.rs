use std::future::Future;
use std::pin::Pin;

use actix_web::{dev, web, FromRequest, HttpRequest};

use crate::error::RestError;
use crate::model::Role;

use super::{Identity, IdentityProvider};

/// Any signed-in user
#[derive(Debug)]
pub struct Authenticated(pub Identity);

impl FromRequest for Authenticated {
    type Error = RestError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let identity = identity_provider(&req)?
                .current_user(req.headers())
                .ok_or_else(|| RestError::Unauthorized("Sign in required".into()))?;

            Ok(Authenticated(identity))
        })
    }
}

/// A signed-in user holding the admin role
#[derive(Debug)]
pub struct Administrator(pub Identity);

impl FromRequest for Administrator {
    type Error = RestError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let provider = identity_provider(&req)?;
            // Pull the session from the headers
            let identity = provider
                .current_user(req.headers())
                .ok_or_else(|| RestError::Unauthorized("Sign in required".into()))?;
            // Check the role held on the local user record
            match provider.role(&identity).await? {
                Role::Admin => Ok(Administrator(identity)),
                Role::User => Err(RestError::Forbidden("Administrator role required".into())),
            }
        })
    }
}

impl AsRef<Identity> for Administrator {
    fn as_ref(&self) -> &Identity {
        &self.0
    }
}

// NOTE: Must be registered with the application at startup
fn identity_provider(req: &HttpRequest) -> Result<web::Data<dyn IdentityProvider>, RestError> {
    req.app_data::<web::Data<dyn IdentityProvider>>()
        .cloned()
        .ok_or_else(|| RestError::InternalError("Identity provider not registered".into()))
}
