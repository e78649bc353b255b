//! Background work for StudioFlow.
//!
//! This crate provides:
//! - A sharded dispatch queue that hands committed workflow events to the
//!   notification dispatcher, preserving order per deliverable or project
//! - The shard workers that drain it
//! - A cron scheduler for notification retention cleanup

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::EventHandler;
pub use queue::DispatchQueue;
pub use runner::DispatchRunner;
pub use scheduler::CronScheduler;
