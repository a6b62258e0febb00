//! Clip extraction: request validation, the job pipeline, and its failure
//! taxonomy.

mod artifact;
mod error;
mod health;
mod orchestrator;
mod request;
mod settings;

pub use artifact::TempArtifact;
pub use error::{ClipError, FailureKind, REQUIRED_FIELDS_MESSAGE};
pub use health::{HealthReport, ServiceStatus, ToolStatus, UNAVAILABLE_MESSAGE};
pub use orchestrator::{ClipOrchestrator, ClipOutput, JobStage};
pub use request::{ClipPayload, ClipRequest};
pub use settings::{ClipSettings, TOOL_NAME};
