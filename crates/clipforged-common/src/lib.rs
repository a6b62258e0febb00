//! Clipforged-Common: Shared identifiers and utilities.
//!
//! This crate provides common functionality used across clipforged:
//!
//! - **Job IDs**: Opaque tokens that namespace one extraction job's temporary files
//! - **Path Utilities**: Download filename sanitization and container content types
//!
//! # Examples
//!
//! ```
//! use clipforged_common::JobId;
//! use clipforged_common::paths::sanitize_title;
//!
//! let job_id = JobId::new();
//! assert!(!job_id.as_str().is_empty());
//!
//! assert_eq!(sanitize_title("My Clip!! 2024"), "My Clip 2024");
//! ```

pub mod ids;
pub mod paths;

pub use ids::*;
