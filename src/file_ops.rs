//! File operations module - Destination setup and copy functionality
//!
//! This module creates the `Keep`/`Discard` folders and copies
//! reviewed images into them.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Result, SifterError};

pub const KEEP_DIR: &str = "Keep";
pub const DISCARD_DIR: &str = "Discard";

/// A prepared destination root with its two category folders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    root: PathBuf,
    keep_dir: PathBuf,
    discard_dir: PathBuf,
}

impl Destination {
    fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            keep_dir: root.join(KEEP_DIR),
            discard_dir: root.join(DISCARD_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn keep_dir(&self) -> &Path {
        &self.keep_dir
    }

    pub fn discard_dir(&self) -> &Path {
        &self.discard_dir
    }
}

/// Create `Keep` and `Discard` under `dest_root`.
///
/// Fails without touching the filesystem if either already exists. The
/// existence check and the creation are not atomic against other processes.
pub fn prepare_destination(dest_root: &Path) -> Result<Destination> {
    let destination = Destination::new(dest_root);

    if destination.keep_dir.exists() || destination.discard_dir.exists() {
        warn!(
            "Destination {} is already organized, refusing to reuse it",
            dest_root.display()
        );
        return Err(SifterError::DestinationAlreadyOrganized {
            root: dest_root.to_path_buf(),
        });
    }

    fs::create_dir(&destination.keep_dir)
        .map_err(|e| SifterError::io(&destination.keep_dir, e))?;

    if let Err(e) = fs::create_dir(&destination.discard_dir) {
        // Leave the root as it was found
        let _ = fs::remove_dir(&destination.keep_dir);
        return Err(SifterError::io(&destination.discard_dir, e));
    }

    info!(
        "Created {} and {}",
        destination.keep_dir.display(),
        destination.discard_dir.display()
    );
    Ok(destination)
}

/// Copy `source` into `dest_dir` under its own file name.
///
/// An existing file of the same name is overwritten. Returns the path written.
pub fn copy_into(source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| SifterError::CopyFailed {
        source_path: source.to_path_buf(),
        destination: dest_dir.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let dest_path = dest_dir.join(file_name);

    match fs::copy(source, &dest_path) {
        Ok(bytes) => {
            info!(
                "Copied: {} -> {} ({} bytes)",
                source.display(),
                dest_path.display(),
                bytes
            );
            Ok(dest_path)
        }
        Err(e) => {
            warn!(
                "Failed to copy {} -> {}: {}",
                source.display(),
                dest_path.display(),
                e
            );
            Err(SifterError::CopyFailed {
                source_path: source.to_path_buf(),
                destination: dest_path,
                source: e,
            })
        }
    }
}
