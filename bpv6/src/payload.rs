/*!
Decoding of the payload block.

The payload of a bundle flagged as an administrative record is decoded as
one. Otherwise the payload is opaque, but a CBHE bundle exchanged between a
well-known pair of services is tagged so that the caller can hand the
payload bytes to the decoder for that sub-protocol.
*/

use super::*;
use admin_record::AdministrativeRecord;
use bundle::DecodeContext;
use tracing::debug;

/// A sub-protocol carried in the payload of a bundle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SubProtocol {
    /// CCSDS File Delivery Protocol.
    FileDelivery,
    /// Asynchronous management protocol.
    Management,
}

#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Payload {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub admin_record: Option<AdministrativeRecord>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub sub_protocol: Option<SubProtocol>,
}

impl Payload {
    /// `reader` is bounded to the payload data.
    pub(crate) fn parse(
        mut reader: Reader,
        data: Range<usize>,
        ctx: &DecodeContext,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        if ctx.is_admin_record {
            if !ctx.config.admin_records {
                return Self::default();
            }

            return match AdministrativeRecord::parse(&mut reader, data.len(), diagnostics) {
                Ok(record) => Self {
                    admin_record: Some(record),
                    sub_protocol: None,
                },
                Err(e) => {
                    debug!("Failed to decode administrative record: {e}");
                    diagnostics.push(Diagnostic::from_error(&e, data));
                    Self::default()
                }
            };
        }

        Self {
            admin_record: None,
            sub_protocol: ctx
                .services
                .and_then(|(source, destination)| classify(ctx.config, source, destination)),
        }
    }
}

/// Identifies the sub-protocol exchanged between two CBHE service numbers.
pub fn classify(config: &config::Config, source: u64, destination: u64) -> Option<SubProtocol> {
    if config.file_delivery.matches(source, destination) {
        Some(SubProtocol::FileDelivery)
    } else if config.management.matches(source, destination) {
        Some(SubProtocol::Management)
    } else {
        None
    }
}
