/*!
Type-specific decoding of extension blocks.

Each decoder reads from a reader bounded to the block's declared data, so
no decoder can consume bytes belonging to the following block.
*/

use super::*;
use block::{Body, Header, Type};
use bundle::DecodeContext;

mod bpsec;
mod bundle_age;
mod cteb;
mod ecos;
mod metadata;
mod previous_hop;

pub use bpsec::{SecurityBlock, SecurityItem, SecurityItemType, SecurityValue};
pub use bundle_age::BundleAge;
pub use cteb::CustodyTransfer;
pub use ecos::{EcosFlags, ExtendedClassOfService};
pub use metadata::Metadata;
pub use previous_hop::PreviousHop;

pub(crate) fn parse(
    header: &Header,
    reader: &mut Reader,
    ctx: &DecodeContext,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Body, Error> {
    match header.block_type {
        Type::BundleAge => BundleAge::parse(reader).map(Body::BundleAge),
        Type::PreviousHopInsertion => PreviousHop::parse(reader).map(Body::PreviousHop),
        Type::Integrity | Type::Confidentiality => {
            SecurityBlock::parse(reader).map(Body::Security)
        }
        Type::CustodyTransferEnhancement => {
            CustodyTransfer::parse(header, reader, ctx, diagnostics).map(Body::CustodyTransfer)
        }
        Type::ExtendedClassOfService => {
            ExtendedClassOfService::parse(header, reader, diagnostics)
                .map(Body::ExtendedClassOfService)
        }
        Type::Metadata => Metadata::parse(reader).map(Body::Metadata),
        Type::Payload
        | Type::Authentication
        | Type::ExtensionSecurity
        | Type::Unrecognised(_) => Ok(Body::Opaque),
    }
}

// The range of the whole block data, for advisories about the block as a whole
fn data_range(reader: &Reader, start: usize) -> Range<usize> {
    start..reader.end()
}
