use std::path::PathBuf;
use thiserror::Error;

/// Fatal load failures, raised before or during the file read. Problems
/// inside the file content are parse warnings, never errors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension (expected .a2l): {}", .0.display())]
    WrongExtension(PathBuf),
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
