// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Capture filename convention parsing.
//!
//! Capture files are named by one of three fixed shapes:
//!
//! - `<id>.<ext>` — e.g. `001.png`
//! - `<prefix>_<id>.<ext>` — e.g. `frame_001.png`
//! - `<prefix>_<user-notes>_<id>.<ext>` — e.g. `frame_left-cam_001.png`
//!
//! The user-notes segment may itself contain underscores
//! (`frame_outdoor_run_001.png` has notes `outdoor_run`). Splitting rules:
//! the prefix is everything before the first underscore, the id is the last
//! underscore segment of the file stem, the extension is the substring after
//! the final period of the file name, and the user notes are whatever sits
//! between the first and last underscore. The extension may be absent.
//!
//! # Example
//!
//! ```rust
//! use roboframes::naming::FrameName;
//!
//! let name = FrameName::parse("/captures/frame_left-cam_001.png")?;
//! assert_eq!(name.frame_id, 1);
//! assert_eq!(name.prefix.as_deref(), Some("frame"));
//! assert_eq!(name.user_notes.as_deref(), Some("left-cam"));
//! assert_eq!(name.extension.as_deref(), Some("png"));
//! # Ok::<(), roboframes::FrameError>(())
//! ```

use std::path::Path;

use crate::core::{FrameError, Result};

/// Parsed components of a capture file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameName {
    /// The frame ID number, parsed from the last underscore segment of the stem
    pub frame_id: u64,
    /// Digit count of the id segment as written (preserves zero padding)
    pub id_width: usize,
    /// Segment before the first underscore, `None` when the name has no underscore
    pub prefix: Option<String>,
    /// Segments between the first and last underscore, `None` when absent
    pub user_notes: Option<String>,
    /// Substring after the final period of the file name, `None` when absent
    pub extension: Option<String>,
}

impl FrameName {
    /// Parse a capture file name from a path.
    ///
    /// Only the final path component is consulted. Fails when the path has
    /// no file name or when the id segment is not an unsigned integer.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<FrameName> {
        let path = path.as_ref();
        let name = file_name_str(path)?;
        let stem = strip_extension(name);

        let id_segment = stem.rsplit('_').next().unwrap_or(stem);
        let frame_id: u64 = id_segment.parse().map_err(|_| {
            FrameError::name_convention(
                name,
                format!("id segment '{id_segment}' is not an unsigned integer"),
            )
        })?;

        Ok(FrameName {
            frame_id,
            id_width: id_segment.len(),
            prefix: prefix_from_name(name),
            user_notes: user_notes_from_name(name),
            extension: extension_from_path(path),
        })
    }

    /// Reassemble the file name from its components.
    ///
    /// Zero padding of the id segment is preserved via `id_width`, so
    /// `parse` followed by `file_name` round-trips.
    pub fn file_name(&self) -> String {
        let mut out = String::new();
        if let Some(prefix) = &self.prefix {
            out.push_str(prefix);
            out.push('_');
        }
        if let Some(notes) = &self.user_notes {
            out.push_str(notes);
            out.push('_');
        }
        out.push_str(&format!("{:0width$}", self.frame_id, width = self.id_width));
        if let Some(ext) = &self.extension {
            out.push('.');
            out.push_str(ext);
        }
        out
    }
}

/// Get the extension for a file from its path, without the period.
///
/// The path can be relative or absolute. Returns `None` when the file name
/// contains no period.
pub fn extension_from_path<P: AsRef<Path>>(path: P) -> Option<String> {
    let name = path.as_ref().file_name()?.to_str()?;
    name.rsplit_once('.').map(|(_, ext)| ext.to_string())
}

/// Get the prefix from a file name.
///
/// The prefix is everything before the first underscore of the full file
/// name (extension included). Returns `None` when the name contains no
/// underscore.
pub fn prefix_from_name(name: &str) -> Option<String> {
    name.split_once('_').map(|(prefix, _)| prefix.to_string())
}

/// Get the user notes from a file name.
///
/// User notes are present only when the full file name splits into three or
/// more underscore segments; they are everything between the first and last
/// underscore.
pub fn user_notes_from_name(name: &str) -> Option<String> {
    if name.split('_').count() <= 2 {
        return None;
    }
    let (_, rest) = name.split_once('_')?;
    let (notes, _) = rest.rsplit_once('_')?;
    Some(notes.to_string())
}

/// Parse the frame id from a path.
///
/// The id is the last underscore segment of the file stem.
pub fn frame_id_from_path<P: AsRef<Path>>(path: P) -> Result<u64> {
    Ok(FrameName::parse(path)?.frame_id)
}

fn file_name_str(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FrameError::name_convention(path.display().to_string(), "no file name"))
}

/// The file stem: the name with the substring after the final period removed.
fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_absolute_path() {
        assert_eq!(
            extension_from_path("/path/to/file/001.png").as_deref(),
            Some("png")
        );
    }

    #[test]
    fn test_extension_relative_paths() {
        assert_eq!(extension_from_path("001.png").as_deref(), Some("png"));
        assert_eq!(
            extension_from_path("relative/001.png").as_deref(),
            Some("png")
        );
    }

    #[test]
    fn test_extension_missing() {
        assert_eq!(extension_from_path("/path/to/file/001"), None);
    }

    #[test]
    fn test_parse_id_only() {
        let name = FrameName::parse("/path/to/file/001.png").unwrap();
        assert_eq!(name.frame_id, 1);
        assert_eq!(name.prefix, None);
        assert_eq!(name.user_notes, None);
        assert_eq!(name.extension.as_deref(), Some("png"));
    }

    #[test]
    fn test_parse_id_only_without_extension() {
        let name = FrameName::parse("/path/to/file/001").unwrap();
        assert_eq!(name.frame_id, 1);
        assert_eq!(name.prefix, None);
        assert_eq!(name.user_notes, None);
        assert_eq!(name.extension, None);
    }

    #[test]
    fn test_parse_prefix_id() {
        let name = FrameName::parse("/path/to/file/frame_001.png").unwrap();
        assert_eq!(name.frame_id, 1);
        assert_eq!(name.prefix.as_deref(), Some("frame"));
        assert_eq!(name.user_notes, None);
        assert_eq!(name.extension.as_deref(), Some("png"));
    }

    #[test]
    fn test_parse_prefix_id_without_extension() {
        let name = FrameName::parse("/path/to/file/frame_001").unwrap();
        assert_eq!(name.frame_id, 1);
        assert_eq!(name.prefix.as_deref(), Some("frame"));
        assert_eq!(name.user_notes, None);
        assert_eq!(name.extension, None);
    }

    #[test]
    fn test_parse_prefix_notes_id() {
        let name = FrameName::parse("/path/to/file/frame_user-notes_001.png").unwrap();
        assert_eq!(name.frame_id, 1);
        assert_eq!(name.prefix.as_deref(), Some("frame"));
        assert_eq!(name.user_notes.as_deref(), Some("user-notes"));
        assert_eq!(name.extension.as_deref(), Some("png"));
    }

    #[test]
    fn test_parse_prefix_notes_with_underscores() {
        let name = FrameName::parse("/path/to/file/frame_user_notes_001.png").unwrap();
        assert_eq!(name.frame_id, 1);
        assert_eq!(name.prefix.as_deref(), Some("frame"));
        assert_eq!(name.user_notes.as_deref(), Some("user_notes"));
        assert_eq!(name.extension.as_deref(), Some("png"));
    }

    #[test]
    fn test_parse_prefix_notes_id_without_extension() {
        let name = FrameName::parse("/path/to/file/frame_user_notes_001").unwrap();
        assert_eq!(name.frame_id, 1);
        assert_eq!(name.prefix.as_deref(), Some("frame"));
        assert_eq!(name.user_notes.as_deref(), Some("user_notes"));
        assert_eq!(name.extension, None);
    }

    #[test]
    fn test_parse_non_numeric_id() {
        let err = FrameName::parse("/path/to/file/frame_abc.png").unwrap_err();
        assert!(matches!(err, FrameError::NameConvention { .. }));
    }

    #[test]
    fn test_parse_empty_stem_segment() {
        assert!(FrameName::parse("/path/to/file/frame_.png").is_err());
    }

    #[test]
    fn test_frame_id_from_path() {
        assert_eq!(frame_id_from_path("frame_042.png").unwrap(), 42);
        assert_eq!(frame_id_from_path("7.csv").unwrap(), 7);
    }

    #[test]
    fn test_file_name_round_trip() {
        for raw in [
            "001.png",
            "001",
            "frame_001.png",
            "frame_001",
            "frame_user-notes_001.png",
            "frame_user_notes_001.png",
            "lidar_outdoor_12345.pcd",
        ] {
            let name = FrameName::parse(raw).unwrap();
            assert_eq!(name.file_name(), raw);
        }
    }

    #[test]
    fn test_file_name_preserves_zero_padding() {
        let name = FrameName::parse("frame_0042.png").unwrap();
        assert_eq!(name.id_width, 4);
        assert_eq!(name.file_name(), "frame_0042.png");
    }
}
