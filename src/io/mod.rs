// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer for capture files.
//!
//! This module provides the extension dispatch tables and the reader
//! backends for the three supported frame kinds:
//!
//! - **Images** in [`image`](crate::io::image) (decoded via the `image` crate)
//! - **Point clouds** in [`pointcloud`](crate::io::pointcloud) (custom PLY/PCD parsers)
//! - **CSV rows** in [`csv`](crate::io::csv)
//!
//! Dispatch is by file extension only; an unrecognized extension maps to
//! [`FrameKind::Unknown`] and reading through it fails with
//! [`FrameError::UnsupportedExtension`](crate::FrameError::UnsupportedExtension).

pub mod csv;
pub mod image;
pub mod pointcloud;

use std::path::Path;

use crate::core::FrameKind;
use crate::naming::extension_from_path;

// Re-exports
pub use self::csv::{read_csv_frames, CsvFrame, CsvValue};
pub use self::image::{
    read_image, read_image_with, ImageBackend, ImageData, ImageReadOptions, PixelBuffer,
};
pub use self::pointcloud::{read_pcd, read_ply, read_pointcloud, PointCloud};

/// Supported image extensions, without the period.
pub fn supported_image_extensions() -> &'static [&'static str] {
    &[
        "bmp", "pbm", "pgm", "ppm", "jpeg", "jpg", "jpe", "jp2", "tiff", "tif", "png",
    ]
}

/// Supported point cloud extensions, without the period.
pub fn supported_pointcloud_extensions() -> &'static [&'static str] {
    &["ply", "pcd"]
}

/// Supported CSV extensions, without the period.
pub fn supported_csv_extensions() -> &'static [&'static str] {
    &["csv"]
}

/// Get the frame kind for a file extension.
///
/// The extension is matched without the period and case-insensitively.
/// Unrecognized extensions map to [`FrameKind::Unknown`].
pub fn frame_kind_from_extension(extension: &str) -> FrameKind {
    let ext = extension.to_ascii_lowercase();
    if supported_image_extensions().contains(&ext.as_str()) {
        FrameKind::Image
    } else if supported_pointcloud_extensions().contains(&ext.as_str()) {
        FrameKind::PointCloud
    } else if supported_csv_extensions().contains(&ext.as_str()) {
        FrameKind::CsvData
    } else {
        FrameKind::Unknown
    }
}

/// Get the frame kind for a file path.
///
/// The path can be relative or absolute; only the extension of the final
/// component is consulted.
pub fn frame_kind_from_path<P: AsRef<Path>>(path: P) -> FrameKind {
    match extension_from_path(path) {
        Some(ext) => frame_kind_from_extension(&ext),
        None => FrameKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extensions_dispatch() {
        for ext in supported_image_extensions() {
            assert_eq!(frame_kind_from_extension(ext), FrameKind::Image);
        }
    }

    #[test]
    fn test_pointcloud_extensions_dispatch() {
        for ext in supported_pointcloud_extensions() {
            assert_eq!(frame_kind_from_extension(ext), FrameKind::PointCloud);
        }
    }

    #[test]
    fn test_csv_extensions_dispatch() {
        for ext in supported_csv_extensions() {
            assert_eq!(frame_kind_from_extension(ext), FrameKind::CsvData);
        }
    }

    #[test]
    fn test_unknown_extension_dispatch() {
        assert_eq!(
            frame_kind_from_extension("some-extension"),
            FrameKind::Unknown
        );
    }

    #[test]
    fn test_dispatch_is_case_insensitive() {
        assert_eq!(frame_kind_from_extension("PNG"), FrameKind::Image);
        assert_eq!(frame_kind_from_extension("Ply"), FrameKind::PointCloud);
    }

    #[test]
    fn test_frame_kind_from_path() {
        assert_eq!(frame_kind_from_path("/path/to/file/001.png"), FrameKind::Image);
        assert_eq!(frame_kind_from_path("001.png"), FrameKind::Image);
        assert_eq!(frame_kind_from_path("relative/001.png"), FrameKind::Image);
        assert_eq!(frame_kind_from_path("scan_001.pcd"), FrameKind::PointCloud);
        assert_eq!(frame_kind_from_path("poses_001.csv"), FrameKind::CsvData);
        assert_eq!(frame_kind_from_path("001"), FrameKind::Unknown);
    }
}
