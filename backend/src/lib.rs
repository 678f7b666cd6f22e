//! Vehicle catalog backend library modules.
//!
//! A token-authenticated CRUD REST service over three related resources:
//! segments, brands, and user-owned vehicles. The crate is split into a
//! transport-agnostic domain, inbound HTTP adapters, outbound PostgreSQL
//! adapters, and server assembly.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
