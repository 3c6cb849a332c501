// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for roboframes.
//!
//! Provides error types for frame I/O operations:
//! - Filename convention parsing
//! - Extension dispatch
//! - Image, point cloud, and CSV decoding

use std::fmt;

/// Errors that can occur during frame I/O operations.
#[derive(Debug, Clone)]
pub enum FrameError {
    /// Filename does not follow a recognized naming convention
    NameConvention {
        /// The file name that failed to parse
        name: String,
        /// Why parsing failed
        reason: String,
    },

    /// File extension is not supported by any reader backend
    UnsupportedExtension {
        /// The extension without the period, empty when the file has none
        extension: String,
    },

    /// Failed to read a file from disk
    ReadError {
        /// Path to the file, empty when unknown
        path: String,
        /// Error message
        message: String,
    },

    /// Failed to decode file contents
    DecodeError {
        /// Format being decoded (e.g., "PLY", "PCD", "CSV", "Image")
        format: String,
        /// Error message
        message: String,
    },

    /// CSV fields and values have different lengths
    FieldMismatch {
        /// Number of fields
        fields: usize,
        /// Number of values
        values: usize,
    },

    /// Other error
    Other(String),
}

impl FrameError {
    /// Create a naming convention error.
    pub fn name_convention(name: impl Into<String>, reason: impl Into<String>) -> Self {
        FrameError::NameConvention {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported extension error.
    pub fn unsupported_extension(extension: impl Into<String>) -> Self {
        FrameError::UnsupportedExtension {
            extension: extension.into(),
        }
    }

    /// Create a read error.
    pub fn read(path: impl Into<String>, message: impl Into<String>) -> Self {
        FrameError::ReadError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(format: impl Into<String>, message: impl Into<String>) -> Self {
        FrameError::DecodeError {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a field/value length mismatch error.
    pub fn field_mismatch(fields: usize, values: usize) -> Self {
        FrameError::FieldMismatch { fields, values }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            FrameError::NameConvention { name, reason } => {
                vec![("name", name.clone()), ("reason", reason.clone())]
            }
            FrameError::UnsupportedExtension { extension } => {
                vec![("extension", extension.clone())]
            }
            FrameError::ReadError { path, message } => {
                vec![("path", path.clone()), ("message", message.clone())]
            }
            FrameError::DecodeError { format, message } => {
                vec![("format", format.clone()), ("message", message.clone())]
            }
            FrameError::FieldMismatch { fields, values } => vec![
                ("fields", fields.to_string()),
                ("values", values.to_string()),
            ],
            FrameError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::NameConvention { name, reason } => {
                write!(f, "Invalid frame name '{name}': {reason}")
            }
            FrameError::UnsupportedExtension { extension } => {
                if extension.is_empty() {
                    write!(f, "Unsupported frame type: file has no extension")
                } else {
                    write!(f, "Unsupported frame type: '{extension}'")
                }
            }
            FrameError::ReadError { path, message } => {
                if path.is_empty() {
                    write!(f, "Read failed: {message}")
                } else {
                    write!(f, "Failed to read '{path}': {message}")
                }
            }
            FrameError::DecodeError { format, message } => {
                write!(f, "{format} decode error: {message}")
            }
            FrameError::FieldMismatch { fields, values } => write!(
                f,
                "Field/value length mismatch: {fields} fields but {values} values"
            ),
            FrameError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<std::io::Error> for FrameError {
    fn from(err: std::io::Error) -> Self {
        FrameError::ReadError {
            path: String::new(),
            message: err.to_string(),
        }
    }
}

/// Result type alias using FrameError.
pub type Result<T> = std::result::Result<T, FrameError>;
