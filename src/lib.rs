//! Tokenboard - a terminal dashboard for The Graph Token API.
//!
//! This library provides:
//! - Endpoint builders and a request executor for the Token API
//! - A per-tab state coordinator with Transfers pagination
//! - Typed result records and their table/detail presentation
//! - The terminal app state, rendering and export used by the binary

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod modules;
pub mod ui;
