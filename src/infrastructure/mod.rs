//! Infrastructure layer - external service integrations
//!
//! This layer contains:
//! - Token API endpoint builders and the request executor
//! - Tokio runtime bridge for async operations

pub mod api;
pub mod runtime;

pub use api::{Endpoints, Executor, FetchError};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
