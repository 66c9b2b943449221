//! Collector module - Image discovery in a single folder
//!
//! This module lists the image files directly inside a folder,
//! grouped by extension in a fixed order.

use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

/// Recognised image extensions, matched case-sensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExtension {
    JpegLower,
    JpegUpper,
    JpgLower,
    JpgUpper,
    PngLower,
    PngUpper,
}

impl ImageExtension {
    /// Collection order of the extension groups
    pub const ALL: [ImageExtension; 6] = [
        ImageExtension::JpegLower,
        ImageExtension::JpegUpper,
        ImageExtension::JpgLower,
        ImageExtension::JpgUpper,
        ImageExtension::PngLower,
        ImageExtension::PngUpper,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageExtension::JpegLower => "jpeg",
            ImageExtension::JpegUpper => "JPEG",
            ImageExtension::JpgLower => "jpg",
            ImageExtension::JpgUpper => "JPG",
            ImageExtension::PngLower => "png",
            ImageExtension::PngUpper => "PNG",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL.into_iter().find(|e| e.as_str() == ext)
    }

    fn group_index(self) -> usize {
        self as usize
    }
}

/// Ordered list of image paths for one review session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    paths: Vec<PathBuf>,
}

impl ImageSet {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }
}

/// Collect the images directly inside `source_dir`.
///
/// Groups follow [`ImageExtension::ALL`]; each group is sorted by file name.
/// Subfolders, hidden files and other extensions are skipped. A missing or
/// unreadable folder yields an empty set.
pub fn collect(source_dir: &Path) -> ImageSet {
    let mut groups: [Vec<PathBuf>; 6] = Default::default();

    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_hidden = entry
            .file_name()
            .to_str()
            .map(|n| n.starts_with('.'))
            .unwrap_or(false);
        if is_hidden {
            continue;
        }

        if let Some(ext) = ImageExtension::from_path(entry.path()) {
            groups[ext.group_index()].push(entry.into_path());
        }
    }

    for (ext, group) in ImageExtension::ALL.iter().zip(groups.iter()) {
        if !group.is_empty() {
            debug!("Found {} *.{} file(s)", group.len(), ext.as_str());
        }
    }

    let images = ImageSet::new(groups.into_iter().flatten().collect());
    info!(
        "Collected {} image(s) from {}",
        images.len(),
        source_dir.display()
    );
    images
}

/// Human-readable size of an image file, or a placeholder when it could not be read
pub fn format_size(bytes: Option<u64>) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

    let Some(bytes) = bytes else {
        return "size unknown".to_string();
    };

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
