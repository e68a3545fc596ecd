use super::*;
use tracing::trace;

/// The fields of a primary block, before endpoint resolution.
pub(crate) struct PrimaryBlock {
    pub version: u8,
    pub flags: Flags,
    pub header_length: usize,
    pub eid_references: EidReferences,
    pub timestamp: CreationTimestamp,
    pub lifetime: u64,
    pub dictionary: Dictionary,
    pub fragment_info: Option<FragmentInfo>,
    pub extent: Range<usize>,
}

impl PrimaryBlock {
    pub fn into_bundle(self, endpoints: dictionary::Endpoints) -> Bundle {
        Bundle {
            version: self.version,
            flags: self.flags,
            destination: endpoints.destination,
            source: endpoints.source,
            report_to: endpoints.report_to,
            custodian: endpoints.custodian,
            timestamp: self.timestamp,
            lifetime: self.lifetime,
            fragment_info: self.fragment_info,
            eid_references: self.eid_references,
            dictionary: self.dictionary,
            header_length: self.header_length,
            primary_extent: self.extent,
            ..Default::default()
        }
    }
}

/// The wire layout of one family of bundle protocol versions.
///
/// The version octet selects the codec, which then decodes the rest of the
/// primary block and the processing flags of each canonical block.
pub(crate) trait PrimaryHeaderCodec: Sync {
    /// Decodes the primary block; `reader` is positioned after the version octet.
    fn parse(
        &self,
        version: u8,
        reader: &mut Reader,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<PrimaryBlock, Error>;

    fn parse_block_flags(
        &self,
        reader: &mut Reader,
        block_type: block::Type,
    ) -> Result<block::Flags, Error> {
        let _ = block_type;
        reader
            .parse::<u64>()
            .map(block::Flags::from)
            .map_field_err("block processing control flags")
    }
}

/// The layout of version 4: fixed-width flags, offsets, timestamp and lifetime.
struct V4;

/// The layout of versions 5 and 6, where every integer field is an SDNV.
struct V6;

pub(crate) fn codec(version: u8) -> Option<&'static dyn PrimaryHeaderCodec> {
    match version {
        4 => Some(&V4),
        5 | 6 => Some(&V6),
        _ => None,
    }
}

impl PrimaryHeaderCodec for V4 {
    fn parse(
        &self,
        version: u8,
        reader: &mut Reader,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<PrimaryBlock, Error> {
        let processing = reader
            .read_u8()
            .map_field_err("bundle processing flags")?;
        let cos = reader.read_u8().map_field_err("class of service flags")?;
        let srr = reader
            .read_u8()
            .map_field_err("status report request flags")?;
        let flags = Flags::from_v4(processing, cos, srr);

        let header_length = reader.parse_length().map_field_err("header length")?;
        let header_start = reader.offset();

        let mut offsets = [0u64; 8];
        for o in offsets.iter_mut() {
            *o = reader.read_u16().map_field_err("dictionary offset")? as u64;
        }

        let timestamp = CreationTimestamp::parse_fixed(reader)?;
        let lifetime = reader.read_u32().map_field_err("lifetime")? as u64;

        parse_tail(
            Fields {
                version,
                flags,
                header_length,
                header_start,
                eid_references: EidReferences::from_offsets(offsets),
                timestamp,
                lifetime,
            },
            reader,
            diagnostics,
        )
    }

    fn parse_block_flags(
        &self,
        reader: &mut Reader,
        block_type: block::Type,
    ) -> Result<block::Flags, Error> {
        // The version 4 payload block has a single octet of flags
        if block_type == block::Type::Payload {
            reader
                .read_u8()
                .map(|f| block::Flags::from(f as u64))
                .map_field_err("payload block flags")
        } else {
            reader
                .parse::<u64>()
                .map(block::Flags::from)
                .map_field_err("block processing control flags")
        }
    }
}

impl PrimaryHeaderCodec for V6 {
    fn parse(
        &self,
        version: u8,
        reader: &mut Reader,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<PrimaryBlock, Error> {
        let flags = reader
            .parse::<u64>()
            .map(Flags::from)
            .map_field_err("bundle processing control flags")?;

        let header_length = reader.parse_length().map_field_err("header length")?;
        let header_start = reader.offset();

        let mut offsets = [0u64; 8];
        for o in offsets.iter_mut() {
            *o = reader.parse().map_field_err("dictionary offset")?;
        }

        let timestamp = CreationTimestamp::parse(reader)?;
        let lifetime = reader.parse().map_field_err("lifetime")?;

        parse_tail(
            Fields {
                version,
                flags,
                header_length,
                header_start,
                eid_references: EidReferences::from_offsets(offsets),
                timestamp,
                lifetime,
            },
            reader,
            diagnostics,
        )
    }
}

struct Fields {
    version: u8,
    flags: Flags,
    header_length: usize,
    header_start: usize,
    eid_references: EidReferences,
    timestamp: CreationTimestamp,
    lifetime: u64,
}

// The dictionary and fragment fields are laid out the same way by every version
fn parse_tail(
    fields: Fields,
    reader: &mut Reader,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<PrimaryBlock, Error> {
    let dictionary_len = reader
        .parse_length()
        .map_field_err("dictionary length")?;
    let dictionary = Dictionary {
        extent: reader
            .read_bytes(dictionary_len)
            .map_field_err("dictionary")?,
    };

    let fragment_info = if fields.flags.is_fragment {
        let start = reader.offset();
        let info = FragmentInfo {
            offset: reader.parse().map_field_err("fragment offset")?,
            total_len: reader
                .parse()
                .map_field_err("total application data unit length")?,
        };
        if info.offset >= info.total_len {
            diagnostics.push(Diagnostic::advisory(
                ErrorKind::OffsetRange,
                start..reader.offset(),
                format!(
                    "Fragment offset {} is beyond the total application data unit length {}",
                    info.offset, info.total_len
                ),
            ));
        }
        Some(info)
    } else {
        None
    };

    let consumed = reader.offset() - fields.header_start;
    if consumed != fields.header_length {
        diagnostics.push(Diagnostic::advisory(
            ErrorKind::StructuralMismatch,
            fields.header_start..reader.offset(),
            format!(
                "Primary block length is {} but {consumed} bytes were decoded",
                fields.header_length
            ),
        ));
    }

    trace!(
        "Parsed version {} primary block of {} bytes",
        fields.version,
        reader.offset()
    );

    Ok(PrimaryBlock {
        version: fields.version,
        flags: fields.flags,
        header_length: fields.header_length,
        eid_references: fields.eid_references,
        timestamp: fields.timestamp,
        lifetime: fields.lifetime,
        dictionary,
        fragment_info,
        extent: 0..reader.offset(),
    })
}
