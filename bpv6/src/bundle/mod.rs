/*!
The decoded bundle, and the entry point for decoding one.
*/

use super::*;
use creation_timestamp::CreationTimestamp;
use dictionary::{Dictionary, EidReferences};
use eid::Eid;

mod flags;
mod parse;
mod primary_block;

pub use flags::{Flags, Priority};
pub(crate) use parse::DecodeContext;

/// Fragmentation details from the primary block of a fragment.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FragmentInfo {
    pub offset: u64,
    pub total_len: u64,
}

/// A decoded bundle.
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bundle {
    // From the primary block
    pub version: u8,
    pub flags: Flags,
    pub destination: Eid,
    pub source: Eid,
    pub report_to: Eid,
    pub custodian: Eid,
    pub timestamp: CreationTimestamp,
    /// Lifetime in seconds.
    pub lifetime: u64,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub fragment_info: Option<FragmentInfo>,
    pub eid_references: EidReferences,
    pub dictionary: Dictionary,
    /// The declared length of the primary block after the length field itself.
    pub header_length: usize,
    /// The range of bytes the primary block occupies.
    pub primary_extent: Range<usize>,

    // Unpacked from extension blocks
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub age: Option<core::time::Duration>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub previous_hop: Option<String>,

    /// The canonical blocks, in wire order.
    pub blocks: Vec<block::Block>,
}

impl Bundle {
    /// The first payload block, if one was decoded.
    pub fn payload(&self) -> Option<&block::Block> {
        self.blocks
            .iter()
            .find(|b| b.block_type == block::Type::Payload)
    }

    /// The administrative record carried by the payload, if decoded.
    pub fn admin_record(&self) -> Option<&admin_record::AdministrativeRecord> {
        match &self.payload()?.body {
            block::Body::Payload(p) => p.admin_record.as_ref(),
            _ => None,
        }
    }
}

/// The result of decoding a buffer as a bundle.
///
/// A `ParsedBundle` is returned whenever the primary block decodes. If the
/// block chain could not be followed to its last block, `error` holds the
/// reason and `bundle.blocks` holds the blocks decoded before it.
#[derive(Debug)]
pub struct ParsedBundle {
    pub bundle: Bundle,
    pub diagnostics: Vec<Diagnostic>,
    pub error: Option<Error>,
    /// The number of bytes consumed from the start of the buffer.
    pub length: usize,
}

impl ParsedBundle {
    /// Decodes the bundle starting at the first byte of `data`.
    ///
    /// Fails only if `data` does not start with a primary block of a
    /// supported version, so that callers can try other decoders.
    pub fn parse(data: &[u8], config: &config::Config) -> Result<Self, Error> {
        parse::parse(data, config)
    }

    /// True if the whole bundle decoded without error-severity findings.
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && !self.diagnostics.iter().any(Diagnostic::is_error)
    }
}
