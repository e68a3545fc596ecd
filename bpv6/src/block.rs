/*!
This module defines the structure and components of a BPv6 canonical block.
It includes definitions for block processing control flags, block type codes,
the common block header, and the generic `Block` struct that represents the
payload block and all extension blocks.
*/

use super::*;
use dictionary::EidReference;

/// Represents the block processing control flags of a canonical block.
///
/// These flags, defined in RFC 5050 Section 4.3, control how a node should
/// process the block, and mark the final block of the bundle.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Flags {
    /// If set, the block must be replicated in every fragment of the bundle.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "<&bool as core::ops::Not>::not")
    )]
    pub must_replicate: bool,
    /// If set, a status report should be transmitted if the block can't be processed.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "<&bool as core::ops::Not>::not")
    )]
    pub report_on_failure: bool,
    /// If set, the entire bundle should be deleted if the block can't be processed.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "<&bool as core::ops::Not>::not")
    )]
    pub delete_bundle_on_failure: bool,
    /// If set, this is the final block of the bundle.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "<&bool as core::ops::Not>::not")
    )]
    pub last_block: bool,
    /// If set, this block should be discarded if it can't be processed.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "<&bool as core::ops::Not>::not")
    )]
    pub discard_block_on_failure: bool,
    /// If set, the block was forwarded without being processed.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "<&bool as core::ops::Not>::not")
    )]
    pub forwarded_unprocessed: bool,
    /// If set, the block header carries a list of EID references.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "<&bool as core::ops::Not>::not")
    )]
    pub has_eid_references: bool,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    /// A bitmask of any unrecognized flags encountered during parsing.
    pub unrecognised: Option<u64>,
}

impl From<&Flags> for u64 {
    fn from(value: &Flags) -> Self {
        let mut flags = value.unrecognised.unwrap_or_default();
        if value.must_replicate {
            flags |= 1 << 0;
        }
        if value.report_on_failure {
            flags |= 1 << 1;
        }
        if value.delete_bundle_on_failure {
            flags |= 1 << 2;
        }
        if value.last_block {
            flags |= 1 << 3;
        }
        if value.discard_block_on_failure {
            flags |= 1 << 4;
        }
        if value.forwarded_unprocessed {
            flags |= 1 << 5;
        }
        if value.has_eid_references {
            flags |= 1 << 6;
        }
        flags
    }
}

impl From<u64> for Flags {
    fn from(value: u64) -> Self {
        let mut flags = Self::default();
        let mut unrecognised = value;

        for b in 0..=6 {
            if value & (1 << b) != 0 {
                match b {
                    0 => flags.must_replicate = true,
                    1 => flags.report_on_failure = true,
                    2 => flags.delete_bundle_on_failure = true,
                    3 => flags.last_block = true,
                    4 => flags.discard_block_on_failure = true,
                    5 => flags.forwarded_unprocessed = true,
                    _ => flags.has_eid_references = true,
                }
                unrecognised &= !(1 << b);
            }
        }

        if unrecognised != 0 {
            flags.unrecognised = Some(unrecognised);
        }
        flags
    }
}

/// The type of a BPv6 canonical block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Type {
    /// Payload Block (type code 1, RFC 5050).
    Payload,
    /// Bundle Authentication Block (type code 2, RFC 6257).
    Authentication,
    /// Payload Integrity Block (type code 3, RFC 6257).
    Integrity,
    /// Payload Confidentiality Block (type code 4, RFC 6257).
    Confidentiality,
    /// Previous-Hop Insertion Block (type code 5, RFC 6259).
    PreviousHopInsertion,
    /// Metadata Extension Block (type code 8, RFC 6258).
    Metadata,
    /// Extension Security Block (type code 9, RFC 6257).
    ExtensionSecurity,
    /// Custody Transfer Enhancement Block (type code 10).
    CustodyTransferEnhancement,
    /// Extended Class of Service Block (type code 19).
    ExtendedClassOfService,
    /// Bundle Age Block (type code 20).
    BundleAge,
    /// An unrecognized block type with its type code.
    Unrecognised(u8),
}

impl From<Type> for u8 {
    fn from(value: Type) -> Self {
        match value {
            Type::Payload => 1,
            Type::Authentication => 2,
            Type::Integrity => 3,
            Type::Confidentiality => 4,
            Type::PreviousHopInsertion => 5,
            Type::Metadata => 8,
            Type::ExtensionSecurity => 9,
            Type::CustodyTransferEnhancement => 10,
            Type::ExtendedClassOfService => 19,
            Type::BundleAge => 20,
            Type::Unrecognised(v) => v,
        }
    }
}

impl From<u8> for Type {
    fn from(value: u8) -> Self {
        match value {
            1 => Type::Payload,
            2 => Type::Authentication,
            3 => Type::Integrity,
            4 => Type::Confidentiality,
            5 => Type::PreviousHopInsertion,
            8 => Type::Metadata,
            9 => Type::ExtensionSecurity,
            10 => Type::CustodyTransferEnhancement,
            19 => Type::ExtendedClassOfService,
            20 => Type::BundleAge,
            value => Type::Unrecognised(value),
        }
    }
}

/// The type-specific content of a block.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Body {
    Payload(payload::Payload),
    BundleAge(extension::BundleAge),
    PreviousHop(extension::PreviousHop),
    Security(extension::SecurityBlock),
    CustodyTransfer(extension::CustodyTransfer),
    ExtendedClassOfService(extension::ExtendedClassOfService),
    Metadata(extension::Metadata),
    /// Not decoded beyond its length; see `Block::data`.
    Opaque,
    /// Type-specific decoding failed; the reason is in the bundle diagnostics.
    Malformed,
}

/// A canonical block within a bundle.
///
/// The block's bytes are not copied: `extent` and `data` are ranges within
/// the buffer the bundle was decoded from.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Block {
    /// The type of the block.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub block_type: Type,
    /// The block processing control flags.
    pub flags: Flags,
    /// EID references from the block header, if any.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub eid_references: Vec<EidReference>,
    /// The range of bytes the whole block occupies, header included.
    pub extent: Range<usize>,
    /// The range of bytes of the block-type-specific data.
    pub data: Range<usize>,
    /// The decoded block-type-specific data.
    pub body: Body,
}

/// The common header preceding the data of every canonical block.
#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub block_type: Type,
    pub flags: Flags,
    pub eid_references: Vec<EidReference>,
    pub data_len: usize,
}

impl Header {
    /// Decodes a block header whose flags have the width dictated by `flags_parser`.
    pub(crate) fn parse(
        reader: &mut Reader,
        flags_parser: impl FnOnce(&mut Reader, Type) -> Result<Flags, Error>,
    ) -> Result<Self, Error> {
        let block_type = Type::from(reader.read_u8().map_field_err("block type code")?);
        let flags = flags_parser(reader, block_type)?;

        let mut eid_references = Vec::new();
        if flags.has_eid_references {
            let count = reader
                .parse_length()
                .map_field_err("EID reference count")?;

            // No up-front allocation, as an absurd count fails on truncation
            for _ in 0..count {
                eid_references.push(EidReference {
                    scheme: reader.parse().map_field_err("EID reference scheme offset")?,
                    ssp: reader.parse().map_field_err("EID reference SSP offset")?,
                });
            }
        }

        let data_len = reader.parse_length().map_field_err("block length")?;

        Ok(Self {
            block_type,
            flags,
            eid_references,
            data_len,
        })
    }
}
