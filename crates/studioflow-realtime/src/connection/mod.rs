//! Connection registry: handles, the per-user pool, admission, and
//! heartbeat pruning.

pub mod authenticator;
pub mod handle;
pub mod heartbeat;
pub mod manager;
pub mod pool;
