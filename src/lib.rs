/// Basic application code
pub mod app;
/// Application authorization
pub mod auth;
/// Shopping cart state and its persistence
pub mod cart;
/// Client-side course catalog
pub mod catalog;
/// Checkout step sequencing
pub mod checkout;
/// REST clients for outside services
pub mod client;
/// Controllers for REST endpoints
pub mod controller;
/// Cryptography-related objects
pub mod crypto;
/// Domain objects
pub mod domain;
/// Error enums
pub mod error;
/// Stored records
pub mod model;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Storage backends
pub mod store;
/// Application telemetry for tracing and logging
pub mod telemetry;
