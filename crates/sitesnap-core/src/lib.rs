//! Sitesnap core library
//!
//! Shared configuration, error taxonomy, and the pure request-shaping
//! helpers (field normalization, Drive-safe filename generation) used by
//! the drive client and the API.

pub mod config;
pub mod error;
pub mod fields;
pub mod naming;

pub use config::Config;
pub use error::AppError;
pub use fields::{normalize, CanonicalFields};
