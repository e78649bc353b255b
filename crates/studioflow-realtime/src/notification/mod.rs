//! Notification fan-out: formatting, email delivery, and dispatch.

pub mod dispatcher;
pub mod email;
pub mod formatter;
