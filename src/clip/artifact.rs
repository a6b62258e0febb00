//! Temporary output files owned by a single job.

use clipforged_common::JobId;
use std::path::{Path, PathBuf};

/// The file yt-dlp writes for one job, plus any side files it leaves next to
/// it (`.part`, per-format streams before merging).
///
/// Everything is removed when the guard is dropped, so cleanup runs on every
/// exit path: success, early return, panic unwinding, and cancellation of the
/// owning future. Removal failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct TempArtifact {
    dir: PathBuf,
    stem: String,
    path: PathBuf,
}

impl TempArtifact {
    /// Reserve `{dir}/clip-{job_id}.{extension}`. Nothing is created on disk.
    pub fn new(dir: &Path, job_id: &JobId, extension: &str) -> Self {
        let stem = format!("clip-{}", job_id);
        let path = dir.join(format!("{}.{}", stem, extension));
        Self {
            dir: dir.to_path_buf(),
            stem,
            path,
        }
    }

    /// Path the tool is told to write to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the artifact now instead of waiting for drop.
    pub fn cleanup(self) {
        drop(self);
    }

    fn remove_all(&self) {
        remove_quietly(&self.path);

        // Side files share the job's unique stem; nothing else can match it.
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to scan {:?} for leftovers: {}", self.dir, e);
                }
                return;
            }
        };

        let prefix = format!("{}.", self.stem);
        for entry in entries.flatten() {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(&prefix) {
                remove_quietly(&entry.path());
            }
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        self.remove_all();
    }
}

fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!("Removed temporary file {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to cleanup temp file {:?}: {}", path, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_layout() {
        let dir = tempfile::tempdir().unwrap();
        let id = JobId::new();
        let artifact = TempArtifact::new(dir.path(), &id, "mp4");
        assert_eq!(
            artifact.path(),
            dir.path().join(format!("clip-{}.mp4", id))
        );
        assert!(!artifact.path().exists());
    }

    #[test]
    fn test_drop_removes_output_and_side_files() {
        let dir = tempfile::tempdir().unwrap();
        let id = JobId::new();
        let artifact = TempArtifact::new(dir.path(), &id, "mp4");

        std::fs::write(artifact.path(), b"video").unwrap();
        let part = dir.path().join(format!("clip-{}.mp4.part", id));
        let stream = dir.path().join(format!("clip-{}.f137.mp4", id));
        std::fs::write(&part, b"partial").unwrap();
        std::fs::write(&stream, b"stream").unwrap();

        drop(artifact);

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_other_jobs_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mine = TempArtifact::new(dir.path(), &JobId::new(), "mp4");
        let theirs = TempArtifact::new(dir.path(), &JobId::new(), "mp4");
        std::fs::write(mine.path(), b"a").unwrap();
        std::fs::write(theirs.path(), b"b").unwrap();

        mine.cleanup();

        assert!(theirs.path().exists());
    }

    #[test]
    fn test_missing_dir_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-created");
        let artifact = TempArtifact::new(&missing, &JobId::new(), "mp4");
        artifact.cleanup();
    }

    #[test]
    fn test_cleanup_on_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();

        let result = std::panic::catch_unwind(move || {
            let artifact = TempArtifact::new(&path, &JobId::new(), "mp4");
            std::fs::write(artifact.path(), b"video").unwrap();
            panic!("serialization blew up");
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
