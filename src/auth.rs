mod extractors;
mod identity;

pub use extractors::{Administrator, Authenticated};
pub use identity::{Identity, IdentityProvider, SessionIdentityProvider};
