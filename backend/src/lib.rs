//! Backend library for the Mesto photo-sharing service.
//!
//! Layout follows ports-and-adapters: `domain` holds entities, services, and
//! ports; `inbound` and `outbound` hold the HTTP and persistence adapters;
//! `server` wires them together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware re-exported for app composition.
pub use middleware::trace::Trace;
