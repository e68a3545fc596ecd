use super::*;
use primary_block::PrimaryHeaderCodec;
use tracing::{debug, trace};

/// State threaded from the primary block into the decoding of later blocks.
pub(crate) struct DecodeContext<'a> {
    pub config: &'a config::Config,
    pub is_admin_record: bool,
    /// Present only for CBHE bundles, where the SSPs are service numbers.
    pub services: Option<(u64, u64)>,
    /// The custodian as it appears on the wire, for CTEB validation.
    pub custodian: String,
}

enum State {
    MoreBlocks,
    Done,
}

pub(super) fn parse(data: &[u8], config: &config::Config) -> Result<ParsedBundle, Error> {
    let mut reader = Reader::new(data);
    let version = reader.read_u8().map_field_err("version")?;
    let codec = primary_block::codec(version).ok_or(Error::InvalidVersion(version))?;

    let mut diagnostics = Vec::new();
    let primary = codec.parse(version, &mut reader, &mut diagnostics)?;

    let endpoints =
        primary
            .dictionary
            .resolve_all(data, &primary.eid_references, &mut diagnostics);

    let ctx = DecodeContext {
        config,
        is_admin_record: primary.flags.is_admin_record,
        services: primary.dictionary.is_cbhe().then_some((
            primary.eid_references.source.ssp,
            primary.eid_references.destination.ssp,
        )),
        custodian: match &endpoints.custodian {
            Eid::Unresolved => String::new(),
            eid => eid.to_string(),
        },
    };

    let mut bundle = primary.into_bundle(endpoints);
    let error = parse_blocks(codec, &ctx, &mut reader, &mut bundle, &mut diagnostics).err();

    // Unpack the well-known extension blocks
    for block in &bundle.blocks {
        match &block.body {
            block::Body::BundleAge(age) if bundle.age.is_none() => bundle.age = Some(age.age),
            block::Body::PreviousHop(hop) if bundle.previous_hop.is_none() => {
                bundle.previous_hop = Some(hop.to_string())
            }
            _ => {}
        }
    }

    if error.is_none() && !reader.is_empty() {
        diagnostics.push(Diagnostic::advisory(
            ErrorKind::StructuralMismatch,
            reader.offset()..data.len(),
            format!("{} bytes follow the last block", reader.remaining()),
        ));
    }

    debug!(
        "Decoded version {version} bundle of {} bytes with {} blocks and {} diagnostics",
        reader.offset(),
        bundle.blocks.len(),
        diagnostics.len()
    );

    Ok(ParsedBundle {
        bundle,
        diagnostics,
        error,
        length: reader.offset(),
    })
}

fn parse_blocks(
    codec: &dyn PrimaryHeaderCodec,
    ctx: &DecodeContext,
    reader: &mut Reader,
    bundle: &mut Bundle,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), Error> {
    let mut state = State::MoreBlocks;
    while let State::MoreBlocks = state {
        let block = parse_block(codec, ctx, reader, diagnostics)?;
        if block.flags.last_block {
            state = State::Done;
        }
        bundle.blocks.push(block);
    }
    Ok(())
}

fn parse_block(
    codec: &dyn PrimaryHeaderCodec,
    ctx: &DecodeContext,
    reader: &mut Reader,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<block::Block, Error> {
    let start = reader.offset();
    let header = block::Header::parse(reader, |r, t| codec.parse_block_flags(r, t))?;

    let mut body_reader = reader.take(header.data_len).map_field_err("block data")?;
    let data = body_reader.offset()..body_reader.end();

    trace!(
        "Parsing {:?} block of {} bytes at offset {start}",
        header.block_type, header.data_len
    );

    let body = if header.block_type == block::Type::Payload {
        block::Body::Payload(payload::Payload::parse(
            body_reader,
            data.clone(),
            ctx,
            diagnostics,
        ))
    } else {
        match extension::parse(&header, &mut body_reader, ctx, diagnostics) {
            Ok(block::Body::Opaque) => block::Body::Opaque,
            Ok(body) => {
                if !body_reader.is_empty() {
                    diagnostics.push(Diagnostic::advisory(
                        ErrorKind::StructuralMismatch,
                        body_reader.offset()..data.end,
                        format!(
                            "{} unused bytes at the end of {:?} block",
                            body_reader.remaining(),
                            header.block_type
                        ),
                    ));
                }
                body
            }
            Err(e) => {
                debug!("Failed to decode {:?} block: {e}", header.block_type);
                diagnostics.push(Diagnostic::from_error(&e, data.clone()));
                block::Body::Malformed
            }
        }
    };

    Ok(block::Block {
        block_type: header.block_type,
        flags: header.flags,
        eid_references: header.eid_references,
        extent: start..reader.offset(),
        data,
        body,
    })
}
