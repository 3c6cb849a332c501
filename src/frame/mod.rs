// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Frame container types.
//!
//! A frame is one unit of sensor-collected data tied to a file on disk.
//! [`FrameFile`] carries the id and path and exposes the naming-convention
//! accessors; the typed wrappers add `read()` for their backend:
//!
//! - [`ImageFrame`] reads through [`crate::io::image`]
//! - [`PointCloudFrame`] reads through [`crate::io::pointcloud`]
//! - [`CsvFileFrame`] reads the rows of a CSV file as
//!   [`CsvFrame`](crate::io::csv::CsvFrame) objects
//!
//! [`Frame::from_path`] dispatches on the file extension and fails with an
//! unsupported-extension error for anything outside the three backends.
//!
//! # Example
//!
//! ```rust,no_run
//! use roboframes::frame::Frame;
//!
//! let frame = Frame::from_path("/captures/frame_001.png")?;
//! assert_eq!(frame.frame_id(), 1);
//! # Ok::<(), roboframes::FrameError>(())
//! ```

use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::core::{FrameError, FrameKind, Result};
use crate::io::csv::{read_csv_frames, CsvFrame};
use crate::io::image::{read_image, read_image_with, ImageData, ImageReadOptions};
use crate::io::pointcloud::{read_pointcloud, PointCloud};
use crate::io::frame_kind_from_path;
use crate::naming::{self, FrameName};

/// Base frame data: an id and the file that backs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFile {
    /// The frame ID number
    pub frame_id: u64,
    /// Path to the backing file
    pub filepath: PathBuf,
}

impl FrameFile {
    /// Create a frame with an explicit id.
    pub fn new<P: Into<PathBuf>>(frame_id: u64, filepath: P) -> FrameFile {
        FrameFile {
            frame_id,
            filepath: filepath.into(),
        }
    }

    /// Create a frame with the id parsed from the file name.
    pub fn from_path<P: Into<PathBuf>>(filepath: P) -> Result<FrameFile> {
        let filepath = filepath.into();
        let frame_id = FrameName::parse(&filepath)?.frame_id;
        Ok(FrameFile { frame_id, filepath })
    }

    /// The file name without the extension.
    pub fn file_stem(&self) -> Option<&str> {
        self.filepath.file_stem().and_then(|s| s.to_str())
    }

    /// The file name, extension included.
    pub fn file_name(&self) -> Option<&str> {
        self.filepath.file_name().and_then(|s| s.to_str())
    }

    /// The parent directory of the file.
    pub fn root_path(&self) -> Option<&Path> {
        self.filepath.parent()
    }

    /// The extension without the period, `None` when the name has no period.
    pub fn extension(&self) -> Option<String> {
        naming::extension_from_path(&self.filepath)
    }

    /// The naming-convention prefix, `None` when the name has no underscore.
    pub fn prefix(&self) -> Option<String> {
        self.file_name().and_then(naming::prefix_from_name)
    }

    /// The user notes embedded in the file name, `None` when absent.
    pub fn user_notes(&self) -> Option<String> {
        self.file_name().and_then(naming::user_notes_from_name)
    }

    /// The frame kind implied by the extension.
    pub fn kind(&self) -> FrameKind {
        frame_kind_from_path(&self.filepath)
    }
}

/// An image frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    file: FrameFile,
}

impl ImageFrame {
    /// Create an image frame with an explicit id.
    pub fn new<P: Into<PathBuf>>(frame_id: u64, filepath: P) -> ImageFrame {
        ImageFrame {
            file: FrameFile::new(frame_id, filepath),
        }
    }

    /// Create an image frame with the id parsed from the file name.
    pub fn from_path<P: Into<PathBuf>>(filepath: P) -> Result<ImageFrame> {
        Ok(ImageFrame {
            file: FrameFile::from_path(filepath)?,
        })
    }

    /// Read the image with default options (buffer backend, forced color).
    pub fn read(&self) -> Result<ImageData> {
        read_image(&self.file.filepath)
    }

    /// Read the image with explicit backend and color options.
    pub fn read_with(&self, options: &ImageReadOptions) -> Result<ImageData> {
        read_image_with(&self.file.filepath, options)
    }
}

impl Deref for ImageFrame {
    type Target = FrameFile;

    fn deref(&self) -> &FrameFile {
        &self.file
    }
}

/// A point cloud frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointCloudFrame {
    file: FrameFile,
}

impl PointCloudFrame {
    /// Create a point cloud frame with an explicit id.
    pub fn new<P: Into<PathBuf>>(frame_id: u64, filepath: P) -> PointCloudFrame {
        PointCloudFrame {
            file: FrameFile::new(frame_id, filepath),
        }
    }

    /// Create a point cloud frame with the id parsed from the file name.
    pub fn from_path<P: Into<PathBuf>>(filepath: P) -> Result<PointCloudFrame> {
        Ok(PointCloudFrame {
            file: FrameFile::from_path(filepath)?,
        })
    }

    /// Read the point cloud.
    pub fn read(&self) -> Result<PointCloud> {
        read_pointcloud(&self.file.filepath)
    }
}

impl Deref for PointCloudFrame {
    type Target = FrameFile;

    fn deref(&self) -> &FrameFile {
        &self.file
    }
}

/// A CSV data file.
///
/// Reading yields one [`CsvFrame`] per data row; the file-level frame id is
/// the id embedded in the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFileFrame {
    file: FrameFile,
}

impl CsvFileFrame {
    /// Create a CSV file frame with an explicit id.
    pub fn new<P: Into<PathBuf>>(frame_id: u64, filepath: P) -> CsvFileFrame {
        CsvFileFrame {
            file: FrameFile::new(frame_id, filepath),
        }
    }

    /// Create a CSV file frame with the id parsed from the file name.
    pub fn from_path<P: Into<PathBuf>>(filepath: P) -> Result<CsvFileFrame> {
        Ok(CsvFileFrame {
            file: FrameFile::from_path(filepath)?,
        })
    }

    /// Read the file's rows.
    pub fn read(&self) -> Result<Vec<CsvFrame>> {
        read_csv_frames(&self.file.filepath)
    }
}

impl Deref for CsvFileFrame {
    type Target = FrameFile;

    fn deref(&self) -> &FrameFile {
        &self.file
    }
}

/// A typed frame, dispatched by file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Image-backed frame
    Image(ImageFrame),
    /// Point-cloud-backed frame
    PointCloud(PointCloudFrame),
    /// CSV-backed frame
    Csv(CsvFileFrame),
}

impl Frame {
    /// Create a typed frame from a path, dispatching by extension.
    ///
    /// Fails with an unsupported-extension error when the extension is not
    /// recognized by any backend, and with a naming error when the file
    /// name has no numeric id segment.
    pub fn from_path<P: Into<PathBuf>>(filepath: P) -> Result<Frame> {
        let filepath = filepath.into();
        match frame_kind_from_path(&filepath) {
            FrameKind::Image => Ok(Frame::Image(ImageFrame::from_path(filepath)?)),
            FrameKind::PointCloud => {
                Ok(Frame::PointCloud(PointCloudFrame::from_path(filepath)?))
            }
            FrameKind::CsvData => Ok(Frame::Csv(CsvFileFrame::from_path(filepath)?)),
            FrameKind::Unknown => Err(FrameError::unsupported_extension(
                naming::extension_from_path(&filepath).unwrap_or_default(),
            )),
        }
    }

    /// The frame kind.
    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::Image(_) => FrameKind::Image,
            Frame::PointCloud(_) => FrameKind::PointCloud,
            Frame::Csv(_) => FrameKind::CsvData,
        }
    }

    /// The frame ID number.
    pub fn frame_id(&self) -> u64 {
        self.file().frame_id
    }

    /// The backing file.
    pub fn file(&self) -> &FrameFile {
        match self {
            Frame::Image(f) => f,
            Frame::PointCloud(f) => f,
            Frame::Csv(f) => f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_simple() {
        let frame = ImageFrame::new(0, "/path/to/file/001.png");
        assert_eq!(frame.frame_id, 0);
        assert_eq!(frame.filepath, PathBuf::from("/path/to/file/001.png"));
    }

    #[test]
    fn test_file_properties_id_with_extension() {
        let frame = ImageFrame::new(1, "/path/to/file/001.png");
        assert_eq!(frame.file_stem(), Some("001"));
        assert_eq!(frame.file_name(), Some("001.png"));
        assert_eq!(frame.root_path(), Some(Path::new("/path/to/file")));
        assert_eq!(frame.extension().as_deref(), Some("png"));
        assert_eq!(frame.prefix(), None);
        assert_eq!(frame.user_notes(), None);
    }

    #[test]
    fn test_file_properties_id_without_extension() {
        let frame = ImageFrame::new(1, "/path/to/file/001");
        assert_eq!(frame.file_stem(), Some("001"));
        assert_eq!(frame.file_name(), Some("001"));
        assert_eq!(frame.root_path(), Some(Path::new("/path/to/file")));
        assert_eq!(frame.extension(), None);
        assert_eq!(frame.prefix(), None);
        assert_eq!(frame.user_notes(), None);
    }

    #[test]
    fn test_file_properties_prefix_id() {
        let frame = ImageFrame::new(1, "/path/to/file/frame_001.png");
        assert_eq!(frame.file_stem(), Some("frame_001"));
        assert_eq!(frame.file_name(), Some("frame_001.png"));
        assert_eq!(frame.extension().as_deref(), Some("png"));
        assert_eq!(frame.prefix().as_deref(), Some("frame"));
        assert_eq!(frame.user_notes(), None);
    }

    #[test]
    fn test_file_properties_prefix_usernotes_id() {
        let frame = ImageFrame::new(1, "/path/to/file/frame_user-notes_001.png");
        assert_eq!(frame.file_stem(), Some("frame_user-notes_001"));
        assert_eq!(frame.prefix().as_deref(), Some("frame"));
        assert_eq!(frame.user_notes().as_deref(), Some("user-notes"));
    }

    #[test]
    fn test_file_properties_usernotes_with_underscores() {
        let frame = ImageFrame::new(1, "/path/to/file/frame_user_notes_001.png");
        assert_eq!(frame.prefix().as_deref(), Some("frame"));
        assert_eq!(frame.user_notes().as_deref(), Some("user_notes"));
    }

    #[test]
    fn test_from_path_parses_id() {
        let frame = PointCloudFrame::from_path("/captures/lidar_042.pcd").unwrap();
        assert_eq!(frame.frame_id, 42);
        assert_eq!(frame.prefix().as_deref(), Some("lidar"));
    }

    #[test]
    fn test_frame_dispatch() {
        assert!(matches!(
            Frame::from_path("/captures/001.png").unwrap(),
            Frame::Image(_)
        ));
        assert!(matches!(
            Frame::from_path("/captures/scan_001.ply").unwrap(),
            Frame::PointCloud(_)
        ));
        assert!(matches!(
            Frame::from_path("/captures/poses_001.csv").unwrap(),
            Frame::Csv(_)
        ));
    }

    #[test]
    fn test_frame_dispatch_unknown_extension() {
        let err = Frame::from_path("/captures/001.xyz").unwrap_err();
        assert!(matches!(
            err,
            FrameError::UnsupportedExtension { extension } if extension == "xyz"
        ));
    }

    #[test]
    fn test_frame_dispatch_no_extension() {
        let err = Frame::from_path("/captures/001").unwrap_err();
        assert!(matches!(
            err,
            FrameError::UnsupportedExtension { extension } if extension.is_empty()
        ));
    }

    #[test]
    fn test_frame_accessors() {
        let frame = Frame::from_path("/captures/frame_007.png").unwrap();
        assert_eq!(frame.kind(), FrameKind::Image);
        assert_eq!(frame.frame_id(), 7);
        assert_eq!(frame.file().prefix().as_deref(), Some("frame"));
    }
}
