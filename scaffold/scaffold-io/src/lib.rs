//! Region file I/O for anatomical scaffolds.
//!
//! This crate loads and saves [`Region`]s:
//!
//! - **Files** - [`read_region`], [`write_region`] and the atomic
//!   [`write_region_in_place`]
//! - **Memory resources** - [`write_group_to_memory`] encodes just the part
//!   of a region belonging to one group
//!
//! # Layer 0 Crate
//!
//! Regions are stored as a versioned JSON document. The EX-style extensions
//! used for scaffold files (`exf`, `exnode`, `exregion`) and plain `json` are
//! all read and written as that document, so file names produced by the
//! scaffold tools keep their familiar extensions.
//!
//! # Example
//!
//! ```no_run
//! use scaffold_io::{read_region, write_region};
//!
//! let region = read_region("whole_body.exf").unwrap();
//! write_region(&region, "copy.exf").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod document;
mod error;
mod memory;

pub use document::{DOCUMENT_FORMAT, DOCUMENT_VERSION};
pub use error::{RegionIoError, RegionIoResult};
pub use memory::{
    read_region_from_memory, write_group_to_memory, write_region_to_memory, MemoryResource,
};

use std::fs::File;
use std::path::Path;

use scaffold_types::Region;
use tempfile::NamedTempFile;
use tracing::debug;

/// Supported region file extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionFormat {
    /// Element and field file (`.exf`).
    Exf,
    /// Node-only file (`.exnode`).
    ExNode,
    /// Region file (`.exregion`).
    ExRegion,
    /// Plain JSON (`.json`).
    Json,
}

impl RegionFormat {
    /// Detect format from file extension, case-insensitively.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        Self::from_extension(&ext)
    }

    /// Parse a bare extension (no leading dot).
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "exf" => Some(Self::Exf),
            "exnode" => Some(Self::ExNode),
            "exregion" => Some(Self::ExRegion),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Exf => "exf",
            Self::ExNode => "exnode",
            Self::ExRegion => "exregion",
            Self::Json => "json",
        }
    }
}

fn detect_format(path: &Path) -> RegionIoResult<RegionFormat> {
    RegionFormat::from_path(path).ok_or_else(|| RegionIoError::UnknownFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a region from a file.
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file does not exist or cannot be read
/// - The content is not a region document
pub fn read_region<P: AsRef<Path>>(path: P) -> RegionIoResult<Region> {
    let path = path.as_ref();
    detect_format(path)?;
    let region = document::read_file(path)?;
    debug!(
        path = %path.display(),
        nodes = region.nodes().len(),
        fields = region.fields().len(),
        "Loaded region"
    );
    Ok(region)
}

/// Save a region to a file, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the extension is not recognized or the file cannot
/// be written.
pub fn write_region<P: AsRef<Path>>(region: &Region, path: P) -> RegionIoResult<()> {
    let path = path.as_ref();
    detect_format(path)?;
    let file = File::create(path).map_err(|e| RegionIoError::write(path, e))?;
    document::write_file(region, &file, path)?;
    debug!(path = %path.display(), "Wrote region");
    Ok(())
}

/// Rewrite a region file atomically.
///
/// The region is written to a temporary file in the destination directory
/// and renamed over `path`, so a failed write leaves the original intact.
///
/// # Errors
///
/// Returns an error if the extension is not recognized or the temporary file
/// cannot be written or renamed.
pub fn write_region_in_place<P: AsRef<Path>>(region: &Region, path: P) -> RegionIoResult<()> {
    let path = path.as_ref();
    detect_format(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = NamedTempFile::new_in(dir).map_err(|e| RegionIoError::write(path, e))?;
    document::write_file(region, temp.as_file(), path)?;
    temp.as_file()
        .sync_all()
        .map_err(|e| RegionIoError::write(path, e))?;
    temp.persist(path)
        .map_err(|e| RegionIoError::write(path, e.error))?;

    debug!(path = %path.display(), "Rewrote region in place");
    Ok(())
}

/// File name of `path` up to its first `.`.
///
/// # Example
///
/// ```
/// use scaffold_io::file_basename;
///
/// assert_eq!(file_basename("/data/heart_v2.exf"), "heart_v2");
/// assert_eq!(file_basename("whole_body.part1.exf"), "whole_body");
/// ```
#[must_use]
pub fn file_basename<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn format_from_path() {
        assert_eq!(RegionFormat::from_path("a.exf"), Some(RegionFormat::Exf));
        assert_eq!(RegionFormat::from_path("a.EXNODE"), Some(RegionFormat::ExNode));
        assert_eq!(RegionFormat::from_path("dir/a.json"), Some(RegionFormat::Json));
        assert_eq!(RegionFormat::from_path("a.stl"), None);
        assert_eq!(RegionFormat::from_path("noext"), None);
    }

    #[test]
    fn extension_roundtrip() {
        for format in [
            RegionFormat::Exf,
            RegionFormat::ExNode,
            RegionFormat::ExRegion,
            RegionFormat::Json,
        ] {
            assert_eq!(RegionFormat::from_extension(format.extension()), Some(format));
        }
    }

    #[test]
    fn basename_stops_at_first_dot() {
        assert_eq!(file_basename("lung.left.exf"), "lung");
        assert_eq!(file_basename("/tmp/.hidden"), "");
        assert_eq!(file_basename("plain"), "plain");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let region = Region::new("r");
        assert!(matches!(
            write_region(&region, "out.stl"),
            Err(RegionIoError::UnknownFormat { .. })
        ));
    }
}
