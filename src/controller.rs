/// Admin dashboard endpoints
pub mod admin;
/// Contact form intake
pub mod contact;
/// Course catalog endpoints
pub mod courses;
/// Order submission and lookup
pub mod orders;
/// Signed-in user endpoints
pub mod users;
/// Identity-provider webhooks
pub mod webhooks;
