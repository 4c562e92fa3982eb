use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan cancelled")]
    Cancelled,

    #[error("failed to read '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ScanError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScanError::Cancelled)
    }

    /// Picks the error to surface when two branches fail. A real failure wins
    /// over a cancellation it may have triggered in a sibling.
    pub(crate) fn prefer(self, other: ScanError) -> ScanError {
        if self.is_cancelled() && !other.is_cancelled() {
            other
        } else {
            self
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
