//! Builder for executing external tool commands with timeout support.

use crate::{Error, Result};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Default command timeout: 10 minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A builder for constructing and executing external tool invocations.
///
/// Standard output and standard error are drained on their own tasks while
/// the process runs, so a chatty tool can never stall on a full pipe. The
/// child is killed if the timeout expires or if the returned future is
/// dropped before the process exits.
///
/// # Example
///
/// ```no_run
/// use clipforged_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # async fn example() -> clipforged_av::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("yt-dlp"))
///     .arg("--version")
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    /// Arguments appended so far, in order.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// - [`Error::ToolLaunch`] if the process cannot be spawned.
    /// - [`Error::ToolFailed`] if it exits with a non-zero status; carries the
    ///   full standard error text.
    /// - [`Error::Timeout`] if it is still running when the timeout expires.
    ///   The process (and on unix its whole process group) is killed and
    ///   reaped before this is returned.
    /// - [`Error::Io`] if waiting on the process fails.
    pub async fn execute(&self) -> Result<ToolOutput> {
        let tool = self.program_name();

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command
            .spawn()
            .map_err(|e| Error::tool_launch(&tool, e.to_string()))?;

        // Helpers the tool forks (ffmpeg under yt-dlp) die with it, on every
        // exit path including drop of this future.
        #[cfg(unix)]
        let group = ProcessGroup::of(&child, &tool);

        let stdout_task = tokio::spawn(drain(child.stdout.take(), tool.clone(), "stdout"));
        let stderr_task = tokio::spawn(drain(child.stderr.take(), tool.clone(), "stderr"));

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_elapsed) => {
                tracing::warn!("{} timed out after {:?}, killing", tool, self.timeout);
                #[cfg(unix)]
                if let Some(group) = &group {
                    group.kill();
                }
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill {}: {}", tool, e);
                }
                stdout_task.abort();
                stderr_task.abort();
                return Err(Error::Timeout {
                    tool,
                    timeout: self.timeout,
                });
            }
        };

        // Leftover background processes would otherwise hold the pipes open.
        #[cfg(unix)]
        if let Some(group) = &group {
            group.kill();
        }

        let stdout = String::from_utf8_lossy(&stdout_task.await.unwrap_or_default()).to_string();
        let stderr = String::from_utf8_lossy(&stderr_task.await.unwrap_or_default()).to_string();

        if !status.success() {
            return Err(Error::ToolFailed {
                tool,
                code: status.code(),
                stderr,
            });
        }

        Ok(ToolOutput {
            status,
            stdout,
            stderr,
        })
    }
}

/// The process group a tool was spawned into. Killed when dropped.
#[cfg(unix)]
struct ProcessGroup {
    pgid: nix::unistd::Pid,
    tool: String,
}

#[cfg(unix)]
impl ProcessGroup {
    fn of(child: &tokio::process::Child, tool: &str) -> Option<Self> {
        let id = i32::try_from(child.id()?).ok()?;
        Some(Self {
            pgid: nix::unistd::Pid::from_raw(id),
            tool: tool.to_string(),
        })
    }

    fn kill(&self) {
        use nix::errno::Errno;
        use nix::sys::signal::{killpg, Signal};

        match killpg(self.pgid, Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => tracing::warn!(
                "Failed to kill process group {} of {}: {}",
                self.pgid,
                self.tool,
                e
            ),
        }
    }
}

#[cfg(unix)]
impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

async fn drain<R>(pipe: Option<R>, tool: String, stream: &'static str) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return Vec::new();
    };

    let mut captured = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        match pipe.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                tracing::debug!(
                    "{} {}: {}",
                    tool,
                    stream,
                    String::from_utf8_lossy(&buf[..n]).trim_end()
                );
                captured.extend_from_slice(&buf[..n]);
            }
            Err(e) => {
                tracing::warn!("Failed reading {} {}: {}", tool, stream, e);
                break;
            }
        }
    }
    captured
}
