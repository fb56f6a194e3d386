mod email_client;
mod payment_client;
mod storefront_client;

pub use email_client::{Email, EmailAuthorizationToken, EmailClient};
pub use payment_client::{PaymentClient, PaymentError, PaymentIntent};
pub use storefront_client::{ApiClientError, ApiResult, StorefrontClient};
