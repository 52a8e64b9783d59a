//! Runtime infrastructure - Tokio runtime bridge for async fetches

mod bridge;
mod worker;

pub use bridge::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
pub use worker::run_async_worker;
