// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Capture directory scanning.
//!
//! A capture directory holds frame files named by the conventions in
//! [`crate::naming`]. [`FrameSet::scan`] walks one directory (not
//! recursively), parses every regular file's name, and builds typed frames
//! sorted by frame id. Files that don't follow the convention or whose
//! extension no backend recognizes are skipped with a warning.
//!
//! # Example
//!
//! ```rust,no_run
//! use roboframes::dataset::FrameSet;
//!
//! let set = FrameSet::scan("/captures/run-01")?;
//! for frame in set.images() {
//!     let img = frame.read()?;
//!     println!("frame {}: {}x{}", frame.frame_id, img.width(), img.height());
//! }
//! # Ok::<(), roboframes::FrameError>(())
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{FrameError, FrameKind, Result};
use crate::frame::{CsvFileFrame, ImageFrame, PointCloudFrame};
use crate::io::frame_kind_from_path;
use crate::naming::FrameName;

/// The typed frames found in one capture directory.
#[derive(Debug, Clone, Default)]
pub struct FrameSet {
    root: PathBuf,
    images: Vec<ImageFrame>,
    point_clouds: Vec<PointCloudFrame>,
    csv_files: Vec<CsvFileFrame>,
}

impl FrameSet {
    /// Scan a capture directory.
    ///
    /// Non-conforming file names and unknown extensions are skipped, not
    /// errors; subdirectories are not entered.
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<FrameSet> {
        let root = root.as_ref();
        let entries = std::fs::read_dir(root)
            .map_err(|e| FrameError::read(root.display().to_string(), e.to_string()))?;

        let mut set = FrameSet {
            root: root.to_path_buf(),
            ..FrameSet::default()
        };

        for entry in entries {
            let entry =
                entry.map_err(|e| FrameError::read(root.display().to_string(), e.to_string()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let name = match FrameName::parse(&path) {
                Ok(name) => name,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping non-conforming file");
                    continue;
                }
            };

            match frame_kind_from_path(&path) {
                FrameKind::Image => set.images.push(ImageFrame::new(name.frame_id, path)),
                FrameKind::PointCloud => set
                    .point_clouds
                    .push(PointCloudFrame::new(name.frame_id, path)),
                FrameKind::CsvData => set.csv_files.push(CsvFileFrame::new(name.frame_id, path)),
                FrameKind::Unknown => {
                    warn!(path = %path.display(), "skipping file with unsupported extension");
                }
            }
        }

        set.images.sort_by_key(|f| f.frame_id);
        set.point_clouds.sort_by_key(|f| f.frame_id);
        set.csv_files.sort_by_key(|f| f.frame_id);

        debug!(
            root = %set.root.display(),
            images = set.images.len(),
            point_clouds = set.point_clouds.len(),
            csv_files = set.csv_files.len(),
            "scanned capture directory"
        );
        Ok(set)
    }

    /// The scanned directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Image frames, sorted by frame id.
    pub fn images(&self) -> &[ImageFrame] {
        &self.images
    }

    /// Point cloud frames, sorted by frame id.
    pub fn point_clouds(&self) -> &[PointCloudFrame] {
        &self.point_clouds
    }

    /// CSV file frames, sorted by frame id.
    pub fn csv_files(&self) -> &[CsvFileFrame] {
        &self.csv_files
    }

    /// Total number of frames across all kinds.
    pub fn len(&self) -> usize {
        self.images.len() + self.point_clouds.len() + self.csv_files.len()
    }

    /// True when no frames were found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summarize the set.
    pub fn info(&self) -> FrameSetInfo {
        let mut prefixes: BTreeSet<String> = BTreeSet::new();
        let mut min_id: Option<u64> = None;
        let mut max_id: Option<u64> = None;

        let mut visit = |frame_id: u64, prefix: Option<String>| {
            if let Some(prefix) = prefix {
                prefixes.insert(prefix);
            }
            min_id = Some(min_id.map_or(frame_id, |m| m.min(frame_id)));
            max_id = Some(max_id.map_or(frame_id, |m| m.max(frame_id)));
        };
        for frame in &self.images {
            visit(frame.frame_id, frame.prefix());
        }
        for frame in &self.point_clouds {
            visit(frame.frame_id, frame.prefix());
        }
        for frame in &self.csv_files {
            visit(frame.frame_id, frame.prefix());
        }

        FrameSetInfo {
            root: self.root.display().to_string(),
            image_count: self.images.len(),
            point_cloud_count: self.point_clouds.len(),
            csv_count: self.csv_files.len(),
            prefixes: prefixes.into_iter().collect(),
            min_frame_id: min_id,
            max_frame_id: max_id,
        }
    }
}

/// Serializable summary of a scanned capture directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSetInfo {
    /// The scanned directory
    pub root: String,
    /// Number of image frames
    pub image_count: usize,
    /// Number of point cloud frames
    pub point_cloud_count: usize,
    /// Number of CSV file frames
    pub csv_count: usize,
    /// Distinct naming-convention prefixes, sorted
    pub prefixes: Vec<String>,
    /// Smallest frame id seen
    pub min_frame_id: Option<u64>,
    /// Largest frame id seen
    pub max_frame_id: Option<u64>,
}

impl FrameSetInfo {
    /// Render the summary as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FrameError::decode("JSON", e.to_string()))
    }
}
