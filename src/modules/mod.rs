//! Feature modules
//!
//! - export: write the active tab's result to CSV or JSON
pub mod export;
