//! # clipforged-av
//!
//! External media tool plumbing for clipforged.
//!
//! This crate provides:
//!
//! - **Time codec** ([`timecode`]) -- seconds to and from yt-dlp's
//!   `HH:MM:SS.mmm` grammar, plus [`SegmentSpec`] for `*START-END` sections.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support; stdout/stderr are drained concurrently and failures are
//!   classified as launch failure, non-zero exit, or timeout.
//! - **Tool probing** ([`check_tool`], [`probe`]) -- existence check plus a
//!   trivial `--version` invocation.
//! - **yt-dlp arguments** ([`ytdlp`]) -- the exact argument list for a
//!   section download.
//!
//! ## Example
//!
//! ```
//! use clipforged_av::SegmentSpec;
//!
//! let segment = SegmentSpec::new(65.0, 125.0);
//! assert_eq!(segment.to_arg(), "*00:01:05.000-00:02:05.000");
//! ```

pub mod command;
mod error;
pub mod timecode;
pub mod tools;
pub mod ytdlp;

// Re-exports
pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use timecode::SegmentSpec;
pub use tools::{check_tool, get_tool_path, probe, require_tool, ToolInfo};
pub use ytdlp::SectionOptions;
