//! Shared test harness for integration tests.
//!
//! Provides [`FakeYtDlp`], a shell script standing in for yt-dlp, and
//! [`TestHarness`], which wires it into a full [`AppContext`] with a private
//! temp directory. [`TestHarness::with_server`] starts Axum on a random port
//! for HTTP-level testing.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::Router;
use clipforged::clip::{ClipOrchestrator, ClipSettings};
use clipforged::config::Config;
use clipforged::server::{create_router, AppContext};
use tempfile::TempDir;

/// Version string the fake tool reports for `--version`.
pub const FAKE_VERSION: &str = "2024.08.06";

/// What the fake yt-dlp does when asked to download a section.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Write this many bytes to the `-o` path and exit 0.
    Success { bytes: usize },
    /// Print to stderr and exit with the given code without writing output.
    Fail { code: i32, stderr: &'static str },
    /// Exit 0 without writing anything.
    NoOutput,
    /// Leave a partial output and a `.part` side file behind, then exit 1.
    PartialThenFail,
    /// Never finish.
    Hang,
    /// Never finish, after forking a helper that writes a side file a
    /// second later.
    HangWithHelper,
    /// Answer the version check, then drop its own exec bit so the
    /// download itself cannot start.
    RevokeExecAfterVersion,
    /// Write this many bytes after holding a lock for a while, logging any
    /// run that finds the lock already taken.
    Exclusive { bytes: usize },
}

/// A fake yt-dlp executable living in its own temp directory.
pub struct FakeYtDlp {
    _dir: TempDir,
    pub path: PathBuf,
    pub args_file: PathBuf,
}

impl FakeYtDlp {
    pub fn new(behavior: Behavior) -> Self {
        let dir = tempfile::tempdir().expect("failed to create tool dir");
        let path = dir.path().join("yt-dlp");
        let args_file = dir.path().join("args.txt");

        let version_action = match behavior {
            Behavior::RevokeExecAfterVersion => "chmod a-x \"$0\"\n  ",
            _ => "",
        };

        let action = match behavior {
            Behavior::Success { bytes } => {
                format!("head -c {} /dev/zero > \"$out\"\nexit 0", bytes)
            }
            Behavior::Fail { code, stderr } => {
                format!("echo '{}' >&2\nexit {}", stderr, code)
            }
            Behavior::NoOutput => "exit 0".to_string(),
            Behavior::PartialThenFail => concat!(
                "head -c 1024 /dev/zero > \"$out\"\n",
                "head -c 512 /dev/zero > \"$out.part\"\n",
                "echo 'ERROR: fragment 3 not found' >&2\n",
                "exit 1"
            )
            .to_string(),
            Behavior::Hang => "exec sleep 30".to_string(),
            Behavior::HangWithHelper => concat!(
                "( sleep 1; head -c 100 /dev/zero > \"$out.part\" ) &\n",
                "exec sleep 30"
            )
            .to_string(),
            Behavior::RevokeExecAfterVersion => "exit 0".to_string(),
            Behavior::Exclusive { bytes } => format!(
                concat!(
                    "echo run >> \"{state}/runs\"\n",
                    "if ! mkdir \"{state}/running\" 2>/dev/null; then\n",
                    "  echo overlap >> \"{state}/overlaps\"\n",
                    "fi\n",
                    "sleep 0.3\n",
                    "rmdir \"{state}/running\" 2>/dev/null\n",
                    "head -c {bytes} /dev/zero > \"$out\"\n",
                    "exit 0"
                ),
                state = dir.path().display(),
                bytes = bytes
            ),
        };

        let script = format!(
            r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "{version}"
  {version_action}exit 0
fi
printf '%s\n' "$@" > "{args}"
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
done
{action}
"#,
            version = FAKE_VERSION,
            version_action = version_action,
            args = args_file.display(),
            action = action,
        );

        fs::write(&path, script).expect("failed to write fake yt-dlp");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("failed to chmod fake yt-dlp");

        Self {
            _dir: dir,
            path,
            args_file,
        }
    }

    /// Lines the tool appended to a file in its own directory.
    pub fn state_lines(&self, name: &str) -> Vec<String> {
        let path = self.args_file.with_file_name(name);
        fs::read_to_string(path)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Arguments of the last section download, one per entry.
    pub fn recorded_args(&self) -> Vec<String> {
        fs::read_to_string(&self.args_file)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub temp_dir: PathBuf,
    pub tool: Option<FakeYtDlp>,
    _root: TempDir,
}

impl TestHarness {
    /// Harness whose yt-dlp behaves as given.
    pub fn new(behavior: Behavior) -> Self {
        Self::with_timeout(behavior, Duration::from_secs(20))
    }

    /// Harness with a custom per-job timeout.
    pub fn with_timeout(behavior: Behavior, timeout: Duration) -> Self {
        Self::with_settings(behavior, |settings| settings.timeout = timeout)
    }

    /// Harness with further adjustments to the resolved clip settings.
    pub fn with_settings(behavior: Behavior, adjust: impl FnOnce(&mut ClipSettings)) -> Self {
        let tool = FakeYtDlp::new(behavior);
        let tool_path = tool.path.clone();
        Self::build(Some(tool), tool_path, adjust)
    }

    /// Harness whose configured yt-dlp path does not exist.
    pub fn without_tool() -> Self {
        Self::build(None, PathBuf::from("/nonexistent/bin/yt-dlp"), |_| {})
    }

    fn build(
        tool: Option<FakeYtDlp>,
        tool_path: PathBuf,
        adjust: impl FnOnce(&mut ClipSettings),
    ) -> Self {
        let root = tempfile::tempdir().expect("failed to create temp root");
        let temp_dir = root.path().join("clips");

        let config = Config::default();
        let mut settings = ClipSettings::from_config(&config);
        settings.tool_path = tool_path;
        settings.temp_dir = temp_dir.clone();
        settings.timeout = Duration::from_secs(20);
        adjust(&mut settings);

        Self {
            ctx: AppContext::with_settings(config, settings),
            temp_dir,
            tool,
            _root: root,
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    pub fn orchestrator(&self) -> &ClipOrchestrator {
        &self.ctx.clipper
    }

    /// Files currently left in the temp directory.
    pub fn temp_files(&self) -> Vec<PathBuf> {
        list_dir(&self.temp_dir)
    }

    /// Lines the fake tool appended to one of its state files.
    pub fn tool_state(&self, name: &str) -> Vec<String> {
        self.tool
            .as_ref()
            .map(|tool| tool.state_lines(name))
            .unwrap_or_default()
    }

    /// Arguments the fake tool was last called with.
    pub fn recorded_args(&self) -> Vec<String> {
        self.tool
            .as_ref()
            .map(FakeYtDlp::recorded_args)
            .unwrap_or_default()
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server(behavior: Behavior) -> (Self, SocketAddr) {
        let harness = Self::new(behavior);
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    }
}
