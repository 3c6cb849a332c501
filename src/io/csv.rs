// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CSV frame reading.
//!
//! Each data row of a CSV file becomes one [`CsvFrame`]. Headers are
//! normalized to lowercase, so lookups are case-insensitive and
//! normalization is idempotent.
//!
//! Two optional feature groups are recognized over the normalized headers:
//!
//! - `timestamp` — a single column, read as `f64` seconds.
//! - pose — the seven columns `pos_x,pos_y,pos_z,quat_w,quat_x,quat_y,quat_z`.
//!   Position and rotation are independently optional; each component
//!   requires its full column set to be considered present, and an absent
//!   component contributes identity to [`CsvFrame::pose`].

use std::path::Path;

use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use serde::Serialize;
use tracing::debug;

use crate::core::{FrameError, Result};

/// Column names of the pose feature group.
pub const POSITION_FIELDS: [&str; 3] = ["pos_x", "pos_y", "pos_z"];
/// Column names of the rotation half of the pose feature group.
pub const ROTATION_FIELDS: [&str; 4] = ["quat_w", "quat_x", "quat_y", "quat_z"];
/// Column name of the timestamp feature group.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// A single CSV cell value.
///
/// Cells are typed by inference when a file is read: integer first, then
/// float, then raw text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CsvValue {
    /// Integer cell
    Int(i64),
    /// Floating point cell
    Float(f64),
    /// Anything else
    Text(String),
}

impl CsvValue {
    /// Infer a typed value from a raw cell.
    pub fn infer(cell: &str) -> CsvValue {
        if let Ok(i) = cell.parse::<i64>() {
            return CsvValue::Int(i);
        }
        if let Ok(f) = cell.parse::<f64>() {
            return CsvValue::Float(f);
        }
        CsvValue::Text(cell.to_string())
    }

    /// Numeric view of the value, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CsvValue::Int(i) => Some(*i as f64),
            CsvValue::Float(f) => Some(*f),
            CsvValue::Text(s) => s.parse().ok(),
        }
    }

    /// Text view of the value, when it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CsvValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One row of a CSV file, keyed by normalized (lowercase) headers.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvFrame {
    /// The frame ID number
    pub frame_id: u64,
    fields: Vec<String>,
    values: Vec<CsvValue>,
}

impl CsvFrame {
    /// Create a frame from parallel field and value lists.
    ///
    /// Field names are normalized to lowercase. Fails when the two lists
    /// have different lengths.
    pub fn new(
        frame_id: u64,
        fields: Vec<String>,
        values: Vec<CsvValue>,
    ) -> Result<CsvFrame> {
        if fields.len() != values.len() {
            return Err(FrameError::field_mismatch(fields.len(), values.len()));
        }
        Ok(CsvFrame {
            frame_id,
            fields: fields.into_iter().map(|f| f.to_lowercase()).collect(),
            values,
        })
    }

    /// Create an empty frame with no fields.
    pub fn empty(frame_id: u64) -> CsvFrame {
        CsvFrame {
            frame_id,
            fields: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Add one field to the frame. The name is normalized to lowercase.
    pub fn add_data(&mut self, name: impl Into<String>, value: CsvValue) {
        self.fields.push(name.into().to_lowercase());
        self.values.push(value);
    }

    /// The normalized field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Look up a value by field name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&CsvValue> {
        let name = name.to_lowercase();
        self.fields
            .iter()
            .position(|f| *f == name)
            .map(|i| &self.values[i])
    }

    /// True when the frame has the named field.
    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn numeric(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(CsvValue::as_f64)
    }

    /// The timestamp column in seconds, when present and numeric.
    pub fn timestamp(&self) -> Option<f64> {
        self.numeric(TIMESTAMP_FIELD)
    }

    /// True when all three `pos_*` columns are present.
    pub fn has_position(&self) -> bool {
        POSITION_FIELDS.iter().all(|f| self.has_field(f))
    }

    /// True when all four `quat_*` columns are present.
    pub fn has_rotation(&self) -> bool {
        ROTATION_FIELDS.iter().all(|f| self.has_field(f))
    }

    /// True when at least one pose component is present.
    pub fn has_pose(&self) -> bool {
        self.has_position() || self.has_rotation()
    }

    /// The translation component, when the full `pos_*` set is present
    /// and numeric.
    pub fn position(&self) -> Option<Translation3<f64>> {
        Some(Translation3::new(
            self.numeric("pos_x")?,
            self.numeric("pos_y")?,
            self.numeric("pos_z")?,
        ))
    }

    /// The rotation component, when the full `quat_*` set is present and
    /// numeric. The quaternion is normalized.
    pub fn rotation(&self) -> Option<UnitQuaternion<f64>> {
        let quat = Quaternion::new(
            self.numeric("quat_w")?,
            self.numeric("quat_x")?,
            self.numeric("quat_y")?,
            self.numeric("quat_z")?,
        );
        Some(UnitQuaternion::from_quaternion(quat))
    }

    /// The frame's pose.
    ///
    /// An absent component contributes identity: zero translation when the
    /// `pos_*` set is missing, unit rotation when the `quat_*` set is.
    pub fn pose(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            self.position().unwrap_or_else(Translation3::identity),
            self.rotation().unwrap_or_else(UnitQuaternion::identity),
        )
    }
}

/// Read a CSV file into one frame per data row.
///
/// Headers are normalized to lowercase. The frame id comes from an `id` or
/// `frame_id` column when one exists, otherwise from the zero-based row
/// index. A non-numeric id cell is a decode error.
pub fn read_csv_frames<P: AsRef<Path>>(path: P) -> Result<Vec<CsvFrame>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| FrameError::read(path.display().to_string(), e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| FrameError::decode("CSV", e.to_string()))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let id_column = headers
        .iter()
        .position(|h| h == "id" || h == "frame_id");

    let mut frames = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            FrameError::decode("CSV", format!("row {row_idx}: {e}"))
        })?;
        if record.len() != headers.len() {
            return Err(FrameError::field_mismatch(headers.len(), record.len()));
        }

        let values: Vec<CsvValue> = record.iter().map(CsvValue::infer).collect();
        let frame_id = match id_column {
            Some(col) => match &values[col] {
                CsvValue::Int(i) if *i >= 0 => *i as u64,
                other => {
                    return Err(FrameError::decode(
                        "CSV",
                        format!("row {row_idx}: invalid id cell {other:?}"),
                    ));
                }
            },
            None => row_idx as u64,
        };

        frames.push(CsvFrame::new(frame_id, headers.clone(), values)?);
    }

    debug!(path = %path.display(), rows = frames.len(), "read csv frames");
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(fields: &[(&str, CsvValue)]) -> CsvFrame {
        let mut frame = CsvFrame::empty(1);
        for (name, value) in fields {
            frame.add_data(*name, value.clone());
        }
        frame
    }

    #[test]
    fn test_new_equal_lengths() {
        let frame = CsvFrame::new(
            1,
            vec!["a".into(), "B".into()],
            vec![CsvValue::Int(1), CsvValue::Float(0.5)],
        )
        .unwrap();
        assert_eq!(frame.frame_id, 1);
        assert_eq!(frame.get("a"), Some(&CsvValue::Int(1)));
        // Headers are normalized
        assert_eq!(frame.get("b"), Some(&CsvValue::Float(0.5)));
        assert_eq!(frame.fields(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_new_mismatched_lengths() {
        let err = CsvFrame::new(1, vec!["a".into(), "b".into()], vec![CsvValue::Int(1)])
            .unwrap_err();
        assert!(matches!(
            err,
            FrameError::FieldMismatch {
                fields: 2,
                values: 1
            }
        ));
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let frame = frame_with(&[("Att_1", CsvValue::Int(7))]);
        assert_eq!(frame.get("att_1"), Some(&CsvValue::Int(7)));
        assert_eq!(frame.get("ATT_1"), Some(&CsvValue::Int(7)));
        assert!(!frame.has_field("att_2"));
    }

    #[test]
    fn test_normalization_idempotent() {
        let once: Vec<String> = ["Pos_X", "QUAT_W"]
            .iter()
            .map(|h| h.to_lowercase())
            .collect();
        let twice: Vec<String> = once.iter().map(|h| h.to_lowercase()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_value_inference() {
        assert_eq!(CsvValue::infer("42"), CsvValue::Int(42));
        assert_eq!(CsvValue::infer("-1"), CsvValue::Int(-1));
        assert_eq!(CsvValue::infer("0.5"), CsvValue::Float(0.5));
        assert_eq!(CsvValue::infer("1e3"), CsvValue::Float(1000.0));
        assert_eq!(
            CsvValue::infer("hello"),
            CsvValue::Text("hello".to_string())
        );
    }

    #[test]
    fn test_timestamp_feature() {
        let frame = frame_with(&[("Timestamp", CsvValue::Float(12.25))]);
        assert_eq!(frame.timestamp(), Some(12.25));
        assert_eq!(CsvFrame::empty(0).timestamp(), None);
    }

    #[test]
    fn test_full_pose() {
        let frame = frame_with(&[
            ("pos_x", CsvValue::Float(1.0)),
            ("pos_y", CsvValue::Float(2.0)),
            ("pos_z", CsvValue::Float(3.0)),
            ("quat_w", CsvValue::Float(1.0)),
            ("quat_x", CsvValue::Float(0.0)),
            ("quat_y", CsvValue::Float(0.0)),
            ("quat_z", CsvValue::Float(0.0)),
        ]);
        assert!(frame.has_position());
        assert!(frame.has_rotation());
        assert!(frame.has_pose());
        let pose = frame.pose();
        assert_eq!(pose.translation.vector.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(pose.rotation, UnitQuaternion::identity());
    }

    #[test]
    fn test_position_only_pose_defaults_rotation_to_identity() {
        let frame = frame_with(&[
            ("pos_x", CsvValue::Float(1.0)),
            ("pos_y", CsvValue::Float(2.0)),
            ("pos_z", CsvValue::Float(3.0)),
        ]);
        assert!(frame.has_position());
        assert!(!frame.has_rotation());
        assert!(frame.has_pose());
        let pose = frame.pose();
        assert_eq!(pose.translation.vector.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(pose.rotation, UnitQuaternion::identity());
    }

    #[test]
    fn test_rotation_only_pose_defaults_position_to_identity() {
        // 180 degree rotation about z
        let frame = frame_with(&[
            ("quat_w", CsvValue::Float(0.0)),
            ("quat_x", CsvValue::Float(0.0)),
            ("quat_y", CsvValue::Float(0.0)),
            ("quat_z", CsvValue::Float(1.0)),
        ]);
        assert!(!frame.has_position());
        assert!(frame.has_rotation());
        let pose = frame.pose();
        assert_eq!(pose.translation.vector.as_slice(), &[0.0, 0.0, 0.0]);
        assert!((pose.rotation.angle() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_partial_position_counts_as_absent() {
        let frame = frame_with(&[
            ("pos_x", CsvValue::Float(1.0)),
            ("pos_y", CsvValue::Float(2.0)),
        ]);
        assert!(!frame.has_position());
        assert!(!frame.has_pose());
        assert_eq!(frame.position(), None);
        assert_eq!(frame.pose(), Isometry3::identity());
    }

    #[test]
    fn test_partial_rotation_counts_as_absent() {
        let frame = frame_with(&[
            ("quat_w", CsvValue::Float(1.0)),
            ("quat_x", CsvValue::Float(0.0)),
            ("quat_y", CsvValue::Float(0.0)),
        ]);
        assert!(!frame.has_rotation());
        assert_eq!(frame.rotation(), None);
    }

    #[test]
    fn test_csv_value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&CsvValue::Int(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&CsvValue::Text("x".into())).unwrap(),
            "\"x\""
        );
    }
}
