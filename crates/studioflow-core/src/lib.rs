//! # studioflow-core
//!
//! Core crate for StudioFlow. Contains configuration schemas, typed
//! identifiers, workflow events, the traits implemented at the edges of
//! the system, and the unified error system.
//!
//! This crate has **no** internal dependencies on other StudioFlow crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
