use super::*;

/// The Metadata extension block (RFC 6258).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metadata {
    pub metadata_type: u64,
    /// The range of the opaque metadata bytes.
    pub data: Range<usize>,
}

impl Metadata {
    pub(super) fn parse(reader: &mut Reader) -> Result<Self, Error> {
        let metadata_type = reader.parse().map_field_err("metadata type")?;
        let data = reader
            .read_bytes(reader.remaining())
            .map_field_err("metadata")?;
        Ok(Self {
            metadata_type,
            data,
        })
    }
}
