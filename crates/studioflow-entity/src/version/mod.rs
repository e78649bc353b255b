//! Version domain entities.

pub mod model;
pub mod status;

pub use model::Version;
pub use status::VersionStatus;
