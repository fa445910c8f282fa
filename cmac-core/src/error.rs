// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Error types for the tile coder.
//!
//! ```text
//! TileCoderError   (construction-time and call-time contract violations)
//! ConfigError      (JSON config file loading, wraps TileCoderError on validation)
//! ```
//!
//! None of these are transient: there is no retry path anywhere in the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient `Result` alias for coder operations.
pub type Result<T> = std::result::Result<T, TileCoderError>;

/// Contract violations raised by [`crate::TileCoder`] and [`crate::TileCoderConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TileCoderError {
    /// A vector's length disagrees with the configured dimensionality.
    #[error("Dimension mismatch for `{what}`: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which vector was wrong (`"point"`, `"limits"`, `"offset_vec"`, ...).
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A coordinate component lies outside its `[low, high)` limit (or is NaN).
    #[error("Coordinate {value} in dimension {dim} is outside [{low}, {high})")]
    OutOfRangeInput {
        dim: usize,
        value: f64,
        low: f64,
        high: f64,
    },

    /// A configuration field has an unusable value.
    #[error("Invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },

    /// An update target was NaN or infinite.
    #[error("Update target must be finite, got {0}")]
    InvalidTarget(f64),
}

impl TileCoderError {
    /// Construct a [`TileCoderError::InvalidConfiguration`].
    pub fn invalid<S: Into<String>>(field: &'static str, reason: S) -> Self {
        TileCoderError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors produced while loading or saving a [`crate::TileCoderConfig`] file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Cannot access config file `{path}`: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for a `TileCoderConfig`.
    #[error("Cannot parse config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but describes an invalid coder.
    #[error("Config file describes an invalid tile coder: {0}")]
    Invalid(#[from] TileCoderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = TileCoderError::invalid("tilings", "must be > 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for `tilings`: must be > 0"
        );

        let err = TileCoderError::DimensionMismatch {
            what: "point",
            expected: 2,
            actual: 3,
        };
        assert!(err.to_string().contains("`point`"));
    }

    #[test]
    fn test_config_error_wraps_validation() {
        let err: ConfigError = TileCoderError::invalid("step_size", "must be > 0").into();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("step_size"));
    }
}
