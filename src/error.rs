//! Error types for the sorting workflow

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while collecting, preparing or reviewing images
#[derive(Debug, Error)]
pub enum SifterError {
    /// The chosen folder holds no recognised image files
    #[error("No images found in {}", folder.display())]
    NoImagesFound { folder: PathBuf },

    /// `Keep` or `Discard` already exists under the destination
    #[error("{} already contains a 'Keep' or 'Discard' directory", root.display())]
    DestinationAlreadyOrganized { root: PathBuf },

    /// Copying the current image did not complete
    #[error("Failed to copy {} to {}: {source}", source_path.display(), destination.display())]
    CopyFailed {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The session was asked for an image past its end
    #[error("Position {cursor} is out of range for {len} image(s)")]
    OutOfRange { cursor: usize, len: usize },

    /// Any other filesystem failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SifterError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error should be shown to the user rather than treated as a caller bug
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::OutOfRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, SifterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_is_not_user_facing() {
        let err = SifterError::OutOfRange { cursor: 2, len: 2 };
        assert!(!err.is_user_facing());
        assert_eq!(err.to_string(), "Position 2 is out of range for 2 image(s)");

        let err = SifterError::DestinationAlreadyOrganized {
            root: PathBuf::from("/photos"),
        };
        assert!(err.is_user_facing());
    }
}
