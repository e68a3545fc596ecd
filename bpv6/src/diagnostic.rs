/*!
Non-fatal findings produced while decoding a bundle.
*/

use super::*;

/// How much of the decode a [`Diagnostic`] affected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Severity {
    /// The decoded values are complete, but something about them is suspect.
    Advisory,
    /// A single block or administrative record was abandoned.
    Error,
}

/// A finding tied to the range of bytes it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: ErrorKind,
    pub range: Range<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn advisory(kind: ErrorKind, range: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Advisory,
            kind,
            range,
            message: message.into(),
        }
    }

    pub fn from_error(error: &Error, range: Range<usize>) -> Self {
        Self {
            severity: Severity::Error,
            kind: error.kind(),
            range,
            message: error.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?} ({:?}) at {}..{}: {}",
            self.severity, self.kind, self.range.start, self.range.end, self.message
        )
    }
}
