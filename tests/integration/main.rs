//! End-to-end tests against the full router over an in-memory store.

mod helpers;
mod notification_test;
mod workflow_test;
mod ws_test;
