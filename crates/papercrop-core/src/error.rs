// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Papercrop.

use thiserror::Error;

/// Top-level error type for all Papercrop operations.
///
/// "No document found" is deliberately absent: detection reports it as
/// `Ok(None)`, never as a failure.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Caller input --
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // -- Geometry --
    #[error("degenerate geometry: rectified output would be {width:.1}x{height:.1}")]
    DegenerateGeometry { width: f64, height: f64 },

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
