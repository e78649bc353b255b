//! Project rooms: broadcast groups joined explicitly by connections.

pub mod registry;
pub mod room;
pub mod subscription;
