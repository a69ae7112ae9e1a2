//! @ai:module:intent Discover the benchmark output layout on disk
//! @ai:module:layer infrastructure
//! @ai:module:public_api DirEntryInfo, EntryKind, list_entries, timings_dir, TIMINGS_LAYER
//! @ai:module:stateless true

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Intermediate directory between a benchmark root and its operator types.
pub const TIMINGS_LAYER: &str = "timings";

/// @ai:intent Classifier applied to directory listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// @ai:intent One named entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub path: PathBuf,
}

impl DirEntryInfo {
    /// @ai:intent File name without its final extension
    /// @ai:effects pure
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    /// @ai:intent Check the final extension against an expected one
    /// @ai:effects pure
    pub fn has_extension(&self, extension: &str) -> bool {
        self.path
            .extension()
            .map(|ext| ext == extension)
            .unwrap_or(false)
    }
}

/// @ai:intent List direct children of a directory of one kind, sorted by name
/// @ai:pre dir exists
/// @ai:post hidden entries and non-UTF-8 names are left out
/// @ai:effects fs:read
pub fn list_entries(dir: &Path, kind: EntryKind) -> Result<Vec<DirEntryInfo>> {
    let mut entries = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        let file_type = entry.file_type();

        let matches_kind = match kind {
            EntryKind::Directory => file_type.is_dir(),
            EntryKind::File => file_type.is_file(),
        };

        if !matches_kind {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::debug!("Skipping non UTF-8 entry {}", entry.path().display());
            continue;
        };

        if name.starts_with('.') {
            continue;
        }

        entries.push(DirEntryInfo {
            name: name.to_string(),
            path: entry.path().to_path_buf(),
        });
    }

    Ok(entries)
}

/// @ai:intent Resolve the timings layer of a benchmark root
/// @ai:post returned path is an existing directory
/// @ai:effects fs:read
pub fn timings_dir(root: &Path) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(Error::NotFound {
            path: root.to_path_buf(),
        });
    }

    let timings = root.join(TIMINGS_LAYER);

    if !timings.is_dir() {
        return Err(Error::MissingLayout {
            root: root.to_path_buf(),
            layer: TIMINGS_LAYER.to_string(),
        });
    }

    Ok(timings)
}
