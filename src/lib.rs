// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # RoboFrames
//!
//! Convenience library for reading robot-captured sensor data from disk.
//!
//! Capture files follow a filename convention (`<prefix>_<user-notes>_<id>.<ext>`,
//! with prefix and notes optional) and are dispatched by extension to one of
//! three reader backends:
//! - **Images** in [`io::image`](crate::io::image) (`png`, `jpg`, `tiff`, ...)
//! - **Point clouds** in [`io::pointcloud`](crate::io::pointcloud) (`ply`, `pcd`)
//! - **CSV rows** in [`io::csv`](crate::io::csv) (`csv`)
//!
//! ## Architecture
//!
//! The library is organized into small layers:
//! - `naming/` - Filename convention parsing (id, prefix, user notes, extension)
//! - `io/` - Extension dispatch tables and the three reader backends
//! - `frame/` - Typed frame containers wrapping a file path and id
//! - `dataset/` - Capture directory scanning into sorted frame sets
//! - `core/` - Errors and shared enums
//!
//! ## Example: Reading a frame
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use roboframes::frame::ImageFrame;
//!
//! let frame = ImageFrame::from_path("/captures/frame_001.png")?;
//! let image = frame.read()?;
//! println!("{}x{} ({} channels)", image.width(), image.height(), image.channels());
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Scanning a capture directory
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use roboframes::dataset::FrameSet;
//!
//! let set = FrameSet::scan("/captures/run-01")?;
//! println!("{}", set.info().to_json()?);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use crate::core::{ColorMode, FrameError, FrameKind, Result};

// Filename convention parsing
pub mod naming;

pub use naming::{extension_from_path, frame_id_from_path, FrameName};

// Extension dispatch and reader backends
pub mod io;

pub use io::{
    frame_kind_from_extension, frame_kind_from_path, read_csv_frames, read_image, read_pointcloud,
    supported_csv_extensions, supported_image_extensions, supported_pointcloud_extensions,
    CsvFrame, CsvValue, ImageBackend, ImageData, ImageReadOptions, PixelBuffer, PointCloud,
};

// Frame containers
pub mod frame;

pub use frame::{CsvFileFrame, Frame, FrameFile, ImageFrame, PointCloudFrame};

// Capture directory scanning
pub mod dataset;

pub use dataset::{FrameSet, FrameSetInfo};
