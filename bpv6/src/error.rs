/*!
This module defines the primary error type for the `bpv6` crate.

Hard failures are reported as an [`Error`], and abandon the structure being
decoded when they occur. [`ErrorKind`] classifies both errors and the
advisory findings reported through [`crate::diagnostic::Diagnostic`].
*/

use super::*;
use hardy_sdnv::decode;
use thiserror::Error;

/// The primary error type for the `bpv6` crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The first octet is not a supported bundle protocol version.
    #[error("Unsupported bundle protocol version {0}")]
    InvalidVersion(u8),

    /// An SDNV or fixed-width field could not be read.
    #[error(transparent)]
    InvalidSdnv(#[from] decode::Error),

    /// An administrative record needs more than the declared length of its payload.
    #[error("Administrative record overruns its {declared} byte payload")]
    RecordOverrun { declared: usize },

    /// An aggregate custody signal contains a range covering no custody IDs.
    #[error("Custody ID range has zero length")]
    EmptyCustodyRange,

    /// An aggregate custody signal range extends beyond the largest custody ID.
    #[error("Custody ID range exceeds 64 bits")]
    CustodyRangeOverflow,

    /// A security block parameter or result item overruns its list.
    #[error("Security {0} item overruns the list length")]
    ListOverrun(&'static str),

    /// A block that must carry an endpoint ID has none.
    #[error("Block has no endpoint ID")]
    MissingEid,

    /// A generic error for when parsing a specific field fails.
    #[error("Failed to parse {field}: {source}")]
    InvalidField {
        /// The name of the field that failed to parse.
        field: &'static str,
        /// The underlying error that caused the failure.
        source: Box<dyn core::error::Error + Send + Sync>,
    },
}

/// Classification of decode failures and advisory findings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorKind {
    /// The data is not a bundle of a supported version.
    InvalidVersion,
    /// The buffer ended before a field was complete.
    Truncated,
    /// A value does not fit its target width.
    Overflow,
    /// A declared offset lies outside its declared region.
    OffsetRange,
    /// Lengths or flags are inconsistent with the structure they describe.
    StructuralMismatch,
    /// A custody transfer enhancement block names a different custodian.
    CustodianMismatch,
}

impl From<&decode::Error> for ErrorKind {
    fn from(value: &decode::Error) -> Self {
        match value {
            decode::Error::Truncated => ErrorKind::Truncated,
            decode::Error::Overflow => ErrorKind::Overflow,
        }
    }
}

impl Error {
    /// Classifies the error, looking through any field context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidVersion(_) => ErrorKind::InvalidVersion,
            Error::InvalidSdnv(e) => e.into(),
            Error::CustodyRangeOverflow => ErrorKind::Overflow,
            Error::RecordOverrun { .. }
            | Error::EmptyCustodyRange
            | Error::ListOverrun(_)
            | Error::MissingEid => ErrorKind::StructuralMismatch,
            Error::InvalidField { source, .. } => {
                if let Some(e) = source.downcast_ref::<Error>() {
                    e.kind()
                } else if let Some(e) = source.downcast_ref::<decode::Error>() {
                    e.into()
                } else {
                    ErrorKind::StructuralMismatch
                }
            }
        }
    }
}

/// A trait for mapping errors to a `Error::InvalidField`.
/// This is useful for providing more context when a parsing error occurs.
pub trait CaptureFieldErr<T> {
    /// Maps the error to a `Error::InvalidField` with the given field name.
    fn map_field_err(self, field: &'static str) -> Result<T, Error>;
}

impl<T, E: Into<Box<dyn core::error::Error + Send + Sync>>> CaptureFieldErr<T>
    for core::result::Result<T, E>
{
    fn map_field_err(self, field: &'static str) -> Result<T, Error> {
        self.map_err(|e| Error::InvalidField {
            field,
            source: e.into(),
        })
    }
}
