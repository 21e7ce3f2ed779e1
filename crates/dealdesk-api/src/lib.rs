// dealdesk-api: Async Rust client for the Dealdesk backoffice REST API
//
// Hand-written client for the marketplace backend. Endpoint methods are
// grouped by resource family (catalog, partners, deals, commerce, media,
// account), all hanging off one `ApiClient`. Authentication runs through
// the identity service; a bearer token is resolved from the configured
// `TokenSource` before every request.

pub mod account;
pub mod catalog;
pub mod client;
pub mod commerce;
pub mod deals;
pub mod error;
pub mod identity;
pub mod media;
pub mod models;
pub mod partners;
pub mod transport;

pub use client::ApiClient;
pub use deals::RedemptionScope;
pub use error::{Error, Result};
pub use identity::{IdentityClient, TokenSource};
pub use transport::{TlsMode, TransportConfig};
