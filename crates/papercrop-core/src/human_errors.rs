// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the capture screen.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity decides what the capture UI offers next.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The photo itself is unusable; take another one.
    Retake,
    /// The photo is fine but the chosen corners are not; drag them again.
    AdjustCorners,
    /// Cannot be fixed from the capture screen (broken settings file, etc.).
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying the same step again can succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError` suitable for the capture screen.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::InvalidInput(detail) => {
            if detail.contains("corner") {
                HumanError {
                    message: "The corners you picked can't be used.".into(),
                    suggestion: "Drag each corner onto a corner of the page, then try again.".into(),
                    retriable: true,
                    severity: Severity::AdjustCorners,
                }
            } else {
                HumanError {
                    message: "We couldn't read that photo.".into(),
                    suggestion: "Please take the photo again.".into(),
                    retriable: true,
                    severity: Severity::Retake,
                }
            }
        }

        ScanError::DegenerateGeometry { .. } => HumanError {
            message: "The selected area is too thin to crop.".into(),
            suggestion: "Move the corners further apart so they surround the whole page.".into(),
            retriable: true,
            severity: Severity::AdjustCorners,
        },

        ScanError::Config(detail) => HumanError {
            message: "The scanner settings are invalid.".into(),
            suggestion: format!("Reset the scanner settings to their defaults. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::Io(_) | ScanError::Serialization(_) => HumanError {
            message: "The scanner settings could not be loaded.".into(),
            suggestion: "Reset the scanner settings to their defaults.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
