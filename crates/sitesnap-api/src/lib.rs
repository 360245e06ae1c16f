//! Sitesnap API library
//!
//! HTTP surface for the construction-photo upload service. Exposed as a
//! library so integration tests can build the router with a fake store.

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod spool;
pub mod state;
pub mod telemetry;
