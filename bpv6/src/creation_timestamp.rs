use super::*;
use dtn_time::DtnTime;
use hardy_sdnv::decode;
use tracing::debug;

/// The bundle creation timestamp: creation time in whole seconds, and a
/// sequence number distinguishing bundles created in the same second.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CreationTimestamp {
    pub creation_time: DtnTime,
    pub sequence_number: u64,
}

impl CreationTimestamp {
    /// Decodes the SDNV form used by version 5/6 primary blocks and by
    /// administrative records.
    pub fn parse(reader: &mut Reader) -> Result<Self, Error> {
        let seconds = reader.parse().map_field_err("creation timestamp time")?;
        let sequence_number =
            parse_sequence_number(reader).map_field_err("creation timestamp sequence number")?;
        Ok(Self {
            creation_time: DtnTime::new(seconds, 0),
            sequence_number,
        })
    }

    /// Decodes the fixed 8-octet form used by version 4 primary blocks.
    pub fn parse_fixed(reader: &mut Reader) -> Result<Self, Error> {
        let seconds = reader.read_u32().map_field_err("creation timestamp time")?;
        let sequence_number = reader
            .read_u32()
            .map_field_err("creation timestamp sequence number")?;
        Ok(Self {
            creation_time: DtnTime::new(seconds as u64, 0),
            sequence_number: sequence_number as u64,
        })
    }
}

// Most agents emit 32-bit sequence numbers, but some use the full signed 64-bit range
fn parse_sequence_number(reader: &mut Reader) -> Result<u64, decode::Error> {
    match reader.parse::<u32>() {
        Ok(v) => Ok(v as u64),
        Err(decode::Error::Overflow) => {
            debug!("Sequence number exceeds 32 bits, decoding as 64-bit");
            reader.parse::<i64>().map(|v| v as u64)
        }
        Err(e) => Err(e),
    }
}

impl core::fmt::Display for CreationTimestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} seq {}", self.creation_time, self.sequence_number)
    }
}
