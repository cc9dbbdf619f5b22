use crate::error::PatchError;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshots the target file before mutation and restores it on failure.
///
/// The backup directory is an explicit value held by the manager and
/// threaded through the run. Backups are kept indefinitely; pruning the
/// directory is the user's business.
#[derive(Debug)]
pub struct BackupManager {
    dir: PathBuf,
}

impl BackupManager {
    /// Backup directory for `target`: the configured override, or a
    /// `backups` directory next to the target.
    pub fn for_target(target: &Path, override_dir: Option<&Path>) -> Self {
        let dir = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => target
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("backups"),
        };
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `target` into the backup directory under a timestamped name,
    /// creating the directory if absent.
    pub fn create(&self, target: &Path) -> Result<PathBuf, PatchError> {
        fs::create_dir_all(&self.dir).map_err(|source| PatchError::io(&self.dir, source))?;

        let stem = target
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("backup");
        let extension = target
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        // Colons and dots are not filesystem-safe everywhere; the timestamp
        // uses dashes throughout.
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
        let backup_path = self
            .dir
            .join(format!("{}-{}{}", stem, timestamp, extension));

        fs::copy(target, &backup_path).map_err(|source| PatchError::io(&backup_path, source))?;
        Ok(backup_path)
    }

    /// Copy a backup back over the target. This is the last-resort path:
    /// the caller logs a failure here but does not propagate it further.
    pub fn restore(&self, backup: &Path, target: &Path) -> Result<(), PatchError> {
        fs::copy(backup, target)
            .map(|_| ())
            .map_err(|source| PatchError::io(target, source))
    }
}
