// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

/// Errors that can occur while building a solver or reading and writing fields.
///
/// Solving itself never fails: unreachable or degenerate cells are a normal
/// state of the arrival-time field.
#[derive(Debug)]
pub enum EikonalError {
    /// The velocity array has no cells.
    EmptyField,
    /// Rows of a nested velocity array have different lengths.
    RaggedRows {
        /// Index of the first offending row.
        row: usize,
        /// Length of row 0.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },
    /// Flat data length does not match the requested shape.
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape encountered.
        got: Vec<usize>,
    },
    /// Speed value is negative or not finite.
    InvalidSpeed {
        /// Row index of the invalid value.
        x: usize,
        /// Column index of the invalid value.
        y: usize,
        /// The invalid value.
        value: f64,
    },
    /// Source cell lies outside the grid.
    SourceOutOfBounds {
        /// The requested source cell.
        source: [usize; 2],
        /// The grid shape.
        shape: [usize; 2],
    },
    /// Goal cell lies outside the grid.
    GoalOutOfBounds {
        /// The requested goal cell.
        goal: [usize; 2],
        /// The grid shape.
        shape: [usize; 2],
    },
    /// Acceptance tolerance is negative or not finite.
    InvalidTolerance(f64),
    /// A sweep limit of zero was requested.
    InvalidMaxSweeps,
    /// Unsupported data type in file.
    UnsupportedDtype(String),
    /// Unsupported file format (unrecognized extension).
    UnsupportedFileFormat(String),
    /// Expected MAT variable not found in file.
    MatVariableNotFound {
        /// The variable name that was requested.
        expected: String,
        /// The variable names that are available.
        available: Vec<String>,
    },
    /// I/O error occurred.
    IoError(std::io::Error),
    /// Other error with a descriptive message.
    Other(String),
}

impl EikonalError {
    /// True for errors caused by a malformed velocity array.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            EikonalError::EmptyField
                | EikonalError::RaggedRows { .. }
                | EikonalError::ShapeMismatch { .. }
                | EikonalError::InvalidSpeed { .. }
        )
    }

    /// True for errors caused by a coordinate outside the grid.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            EikonalError::SourceOutOfBounds { .. } | EikonalError::GoalOutOfBounds { .. }
        )
    }
}

impl fmt::Display for EikonalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EikonalError::EmptyField => write!(f, "invalid input: velocity field is empty"),
            EikonalError::RaggedRows { row, expected, got } => {
                write!(
                    f,
                    "invalid input: row {} has {} cells, expected {}",
                    row, got, expected
                )
            }
            EikonalError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {:?}, got {:?}", expected, got)
            }
            EikonalError::InvalidSpeed { x, y, value } => {
                write!(
                    f,
                    "invalid speed at ({}, {}): {} (must be finite and >= 0)",
                    x, y, value
                )
            }
            EikonalError::SourceOutOfBounds { source, shape } => {
                write!(
                    f,
                    "source ({}, {}) is outside grid of shape {}x{}",
                    source[0], source[1], shape[0], shape[1]
                )
            }
            EikonalError::GoalOutOfBounds { goal, shape } => {
                write!(
                    f,
                    "goal ({}, {}) is outside grid of shape {}x{}",
                    goal[0], goal[1], shape[0], shape[1]
                )
            }
            EikonalError::InvalidTolerance(tol) => {
                write!(f, "invalid tolerance: {} (must be finite and >= 0)", tol)
            }
            EikonalError::InvalidMaxSweeps => write!(f, "max sweeps must be at least 1"),
            EikonalError::UnsupportedDtype(dtype) => {
                write!(f, "unsupported dtype: {}", dtype)
            }
            EikonalError::UnsupportedFileFormat(ext) => {
                write!(f, "unsupported file format: {}", ext)
            }
            EikonalError::MatVariableNotFound {
                expected,
                available,
            } => {
                write!(
                    f,
                    "MAT variable '{}' not found; available variables: {:?}",
                    expected, available
                )
            }
            EikonalError::IoError(e) => write!(f, "I/O error: {}", e),
            EikonalError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for EikonalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EikonalError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EikonalError {
    fn from(e: std::io::Error) -> Self {
        EikonalError::IoError(e)
    }
}

/// Convenience type alias for Results with EikonalError.
pub type Result<T> = std::result::Result<T, EikonalError>;
