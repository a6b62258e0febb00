//! Clipforged - Time-bounded clip extraction from remote streaming video
//!
//! This library crate exposes the core functionality for integration testing.

pub mod clip;
pub mod config;
pub mod server;
