// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout roboframes.
//!
//! This module provides the foundational types for the library:
//! - [`FrameError`] - Comprehensive error handling
//! - [`FrameKind`] - Frame type identifier keyed by file extension
//! - [`ColorMode`] - Color handling for image reads

pub mod error;

pub use error::{FrameError, Result};

/// Frame type identifier.
///
/// Identifies which reader backend a capture file belongs to. The kind is
/// derived from the file extension by the dispatch tables in [`crate::io`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Raster image file (png, jpg, tiff, ...)
    Image,
    /// Point cloud file (ply, pcd)
    PointCloud,
    /// Tabular data file (csv)
    CsvData,
    /// Extension not recognized by any backend
    Unknown,
}

/// Error returned when parsing a `FrameKind` from string fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFrameKindError {
    _private: (),
}

impl std::fmt::Display for ParseFrameKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid frame kind name, expected 'image', 'pointcloud', or 'csvdata'"
        )
    }
}

impl std::error::Error for ParseFrameKindError {}

impl std::str::FromStr for FrameKind {
    type Err = ParseFrameKindError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(FrameKind::Image),
            "pointcloud" => Ok(FrameKind::PointCloud),
            "csvdata" => Ok(FrameKind::CsvData),
            _ => Err(ParseFrameKindError { _private: () }),
        }
    }
}

impl FrameKind {
    /// Check if this kind is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, FrameKind::Image)
    }

    /// Check if this kind is a point cloud.
    pub fn is_point_cloud(&self) -> bool {
        matches!(self, FrameKind::PointCloud)
    }

    /// Check if this kind is CSV data.
    pub fn is_csv_data(&self) -> bool {
        matches!(self, FrameKind::CsvData)
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameKind::Image => "image",
            FrameKind::PointCloud => "pointcloud",
            FrameKind::CsvData => "csvdata",
            FrameKind::Unknown => "unknown",
        }
    }
}

/// Color handling for image reads.
///
/// `Auto` decodes in color and collapses to grayscale when every pixel has
/// equal channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Force 3-channel color output
    #[default]
    Color,
    /// Force single-channel grayscale output
    Grayscale,
    /// Detect from pixel data
    Auto,
}
