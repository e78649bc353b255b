//! Core type definitions used across the StudioFlow workspace.

pub mod id;

pub use id::*;
