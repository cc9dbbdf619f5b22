use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tool configuration, loaded from `~/.claude/cclspfix/config.toml`.
///
/// CLI flags take precedence over file values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Override for the backup directory. When unset, backups go into a
    /// `backups` directory next to the target file.
    pub backup_dir: Option<PathBuf>,
    /// Bytes of context shown on each side of a diff preview.
    pub diff_context: usize,
    /// Colored console output.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_dir: None,
            diff_context: 80,
            color: true,
        }
    }
}
