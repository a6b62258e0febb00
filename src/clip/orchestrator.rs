//! Clip extraction pipeline.
//!
//! One job walks these stages strictly in order, with no retries:
//!
//! ```text
//! Received -> Validated -> ToolChecked -> Extracting -> OutputVerified -> Streaming -> Cleaned
//! ```
//!
//! Validation and the tool check happen before anything touches the
//! filesystem. From `Extracting` onwards the output file is owned by a
//! [`TempArtifact`], which deletes it on every exit path.

use super::artifact::TempArtifact;
use super::error::ClipError;
use super::health::HealthReport;
use super::request::ClipRequest;
use super::settings::ClipSettings;
use super::FailureKind;
use bytes::Bytes;
use clipforged_av::{check_tool, ytdlp, SegmentSpec, ToolInfo};
use clipforged_common::paths::{clip_filename, content_type_for_container};
use clipforged_common::JobId;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;

const UNAVAILABLE_MESSAGE: &str =
    "Video processing service unavailable. Local yt-dlp binary not found.";
const TOOL_FAILED_MESSAGE: &str = "Failed to download and clip video";
const OUTPUT_MISSING_MESSAGE: &str = "Clipped video file was not created";
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Pipeline stage a job has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Received,
    Validated,
    ToolChecked,
    Extracting,
    OutputVerified,
    Streaming,
    Cleaned,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A finished clip, already removed from disk.
#[derive(Debug, Clone)]
pub struct ClipOutput {
    pub job_id: JobId,
    pub bytes: Bytes,
    /// Suggested download name, safe for a `Content-Disposition` header.
    pub filename: String,
    pub content_type: &'static str,
}

impl ClipOutput {
    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Runs clip extraction jobs against one yt-dlp installation.
///
/// Cheap to share behind an `Arc`; jobs for different requests run
/// concurrently up to the configured limit and never share files.
pub struct ClipOrchestrator {
    settings: Arc<ClipSettings>,
    permits: Arc<Semaphore>,
}

impl ClipOrchestrator {
    pub fn new(settings: ClipSettings) -> Self {
        let permits = Arc::new(Semaphore::new(settings.max_concurrent_jobs.max(1)));
        Self {
            settings: Arc::new(settings),
            permits,
        }
    }

    pub fn settings(&self) -> &ClipSettings {
        &self.settings
    }

    /// Probe yt-dlp at the configured path.
    pub async fn check_tool(&self) -> ToolInfo {
        check_tool(&self.settings.tool_path, &self.settings.probe_arg).await
    }

    /// Liveness report. Never fails; an unusable tool is reported as degraded.
    pub async fn health(&self) -> HealthReport {
        HealthReport::from(&self.check_tool().await)
    }

    /// Run one extraction job to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`ClipError`] whose kind tells the caller whether the request
    /// was bad, the service is misconfigured, or this particular download
    /// failed. Temporary files are gone by the time either result is returned.
    ///
    /// The configured timeout bounds the whole job, including the wait for a
    /// permit and the tool check. Only the pre-flight check reports
    /// `ToolUnavailable`; a tool that fails to start after passing it is an
    /// execution failure.
    pub async fn extract(&self, request: ClipRequest) -> Result<ClipOutput, ClipError> {
        let mut stage = JobStage::Received;
        let deadline = self.settings.timeout;
        let result = match tokio::time::timeout(deadline, self.run_job(&request, &mut stage)).await
        {
            Ok(result) => result,
            Err(_elapsed) => Err(ClipError::tool_failed(TOOL_FAILED_MESSAGE)
                .with_details(format!("clip job timed out after {:?}", deadline))),
        };

        if let Err(e) = &result {
            match e.kind {
                FailureKind::InvalidRequest => {
                    tracing::debug!("Rejected clip request: {}", e.message);
                }
                FailureKind::ToolUnavailable => {
                    tracing::error!(
                        "Clip failed after {}: {} ({})",
                        stage,
                        e.message,
                        e.details.as_deref().unwrap_or("")
                    );
                }
                _ => {
                    tracing::warn!(
                        "Clip of {} failed after {}: {} ({})",
                        request.url,
                        stage,
                        e.message,
                        e.details.as_deref().unwrap_or("")
                    );
                }
            }
        }

        result
    }

    async fn run_job(
        &self,
        request: &ClipRequest,
        stage: &mut JobStage,
    ) -> Result<ClipOutput, ClipError> {
        request.validate()?;
        *stage = JobStage::Validated;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ClipError::internal(INTERNAL_MESSAGE).with_details(e.to_string()))?;

        self.ensure_tool().await?;
        *stage = JobStage::ToolChecked;

        let job_id = JobId::new();
        let container = &self.settings.section.output_container;
        let segment = SegmentSpec::new(request.start_time, request.end_time);

        tokio::fs::create_dir_all(&self.settings.temp_dir)
            .await
            .map_err(|e| {
                ClipError::internal(INTERNAL_MESSAGE).with_details(format!(
                    "failed to create temp directory {:?}: {}",
                    self.settings.temp_dir, e
                ))
            })?;

        let artifact = TempArtifact::new(&self.settings.temp_dir, &job_id, container);

        *stage = JobStage::Extracting;
        tracing::info!("Job {}: processing clip {} from {}", job_id, segment, request.url);
        self.download_section(request, &segment, artifact.path())
            .await?;

        let on_disk = verify_output(artifact.path()).await?;
        *stage = JobStage::OutputVerified;

        let bytes = tokio::fs::read(artifact.path()).await.map_err(|e| {
            ClipError::internal(INTERNAL_MESSAGE)
                .with_details(format!("failed to read {:?}: {}", artifact.path(), e))
        })?;
        if bytes.len() as u64 != on_disk {
            tracing::debug!(
                "Job {}: size changed while reading ({} -> {} bytes)",
                job_id,
                on_disk,
                bytes.len()
            );
        }
        let filename = clip_filename(
            request.title.as_deref(),
            &self.settings.default_filename,
            request.start_time,
            request.end_time,
            container,
        );
        *stage = JobStage::Streaming;

        artifact.cleanup();
        *stage = JobStage::Cleaned;

        tracing::info!(
            "Job {}: clip ready as {:?} ({} bytes)",
            job_id,
            filename,
            bytes.len()
        );

        Ok(ClipOutput {
            job_id,
            bytes: Bytes::from(bytes),
            filename,
            content_type: content_type_for_container(container),
        })
    }

    async fn ensure_tool(&self) -> Result<(), ClipError> {
        let info = self.check_tool().await;
        if info.available {
            return Ok(());
        }

        let mut details = format!(
            "yt-dlp binary should be located at {}",
            self.settings.tool_path.display()
        );
        if let Some(error) = info.error {
            details.push_str(&format!(" ({})", error));
        }
        Err(ClipError::tool_unavailable(UNAVAILABLE_MESSAGE).with_details(details))
    }

    async fn download_section(
        &self,
        request: &ClipRequest,
        segment: &SegmentSpec,
        output: &Path,
    ) -> Result<(), ClipError> {
        let command = ytdlp::section_command(
            &self.settings.tool_path,
            &request.url,
            segment,
            output,
            &self.settings.section,
            self.settings.timeout,
        );

        command.execute().await.map(|_| ()).map_err(classify_tool_error)
    }
}

fn classify_tool_error(err: clipforged_av::Error) -> ClipError {
    use clipforged_av::Error;

    match err {
        e @ (Error::ToolNotFound { .. }
        | Error::ToolLaunch { .. }
        | Error::ToolFailed { .. }
        | Error::Timeout { .. }) => {
            ClipError::tool_failed(TOOL_FAILED_MESSAGE).with_details(e.to_string())
        }
        e => ClipError::internal(INTERNAL_MESSAGE).with_details(e.to_string()),
    }
}

/// Confirm the tool actually produced the file and return its size.
async fn verify_output(path: &Path) -> Result<u64, ClipError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        Ok(_) => Err(ClipError::output_missing(OUTPUT_MISSING_MESSAGE)
            .with_details(format!("{:?} is not a regular file", path))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ClipError::output_missing(OUTPUT_MISSING_MESSAGE))
        }
        Err(e) => Err(ClipError::internal(INTERNAL_MESSAGE)
            .with_details(format!("failed to stat {:?}: {}", path, e))),
    }
}
