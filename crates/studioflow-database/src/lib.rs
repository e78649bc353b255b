//! # studioflow-database
//!
//! Store boundary for StudioFlow: the per-entity store traits, their
//! PostgreSQL implementations, and an in-memory implementation used by
//! tests and local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::Stores;
