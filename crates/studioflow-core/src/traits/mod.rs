//! Core traits defined in `studioflow-core` and implemented by other crates.

pub mod event_sink;
pub mod mailer;

pub use event_sink::EventSink;
pub use mailer::Mailer;
