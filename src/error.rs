use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Fatal conditions that unwind to the top-level handler in `main`.
///
/// Soft conditions (already patched, unrecognized construction, missing
/// alias) are not errors; they are reported as `PatchOutcome` variants and
/// the run completes cleanly.
#[derive(Debug)]
pub enum PatchError {
    /// Target path does not exist. Raised before any file access, so no
    /// backup exists and none is restored.
    FileNotFound(PathBuf),
    /// Backup creation, source read, or final write failed.
    Io { path: PathBuf, source: io::Error },
    /// The stable return-statement signature is absent from the file
    /// (wrong file, or an incompatible Claude Code build).
    AnchorNotFound,
    /// The structure around the anchor did not match the expected
    /// function shape.
    BoundaryNotFound(&'static str),
    /// The backward brace scan exhausted the buffer before balancing.
    BracketMismatch,
}

impl PatchError {
    /// Wrap an I/O failure with the path it occurred on.
    pub fn io(path: &Path, source: io::Error) -> Self {
        PatchError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::FileNotFound(path) => {
                write!(f, "target file not found: {}", path.display())
            }
            PatchError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            PatchError::AnchorNotFound => {
                write!(f, "could not find the LSP return-statement anchor")
            }
            PatchError::BoundaryNotFound(reason) => {
                write!(f, "could not resolve function boundaries: {}", reason)
            }
            PatchError::BracketMismatch => {
                write!(f, "bracket mismatch: could not find the function start")
            }
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatchError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
