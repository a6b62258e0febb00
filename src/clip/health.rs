//! Health report for the clip service.

use clipforged_av::ToolInfo;
use serde::Serialize;

/// Reported when yt-dlp cannot be found or run.
pub const UNAVAILABLE_MESSAGE: &str = "Local yt-dlp binary is required for video processing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Available,
    Unavailable,
}

/// Body of the health endpoint. Degradation is reported here, never through
/// an error status.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: ServiceStatus,
    pub tool: ToolStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

impl From<&ToolInfo> for HealthReport {
    fn from(info: &ToolInfo) -> Self {
        if info.available {
            Self {
                status: ServiceStatus::Healthy,
                tool: ToolStatus::Available,
                message: None,
                version: info.version.clone(),
            }
        } else {
            Self {
                status: ServiceStatus::Degraded,
                tool: ToolStatus::Unavailable,
                message: Some(UNAVAILABLE_MESSAGE.to_string()),
                version: None,
            }
        }
    }
}
