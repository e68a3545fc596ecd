use super::*;

/// The Previous-Hop Insertion block (RFC 6259): the node that forwarded
/// the bundle, as a four octet scheme name and an SSP.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PreviousHop {
    pub scheme: String,
    pub ssp: String,
    pub ssp_range: Range<usize>,
}

impl PreviousHop {
    pub(super) fn parse(reader: &mut Reader) -> Result<Self, Error> {
        let scheme = reader.read_slice(4).map_field_err("previous hop scheme")?;
        if reader.is_empty() {
            return Err(Error::MissingEid);
        }
        let ssp_range = reader
            .read_bytes(reader.remaining())
            .map_field_err("previous hop endpoint ID")?;

        Ok(Self {
            scheme: trim_nul(scheme),
            ssp: trim_nul(&reader.data()[ssp_range.clone()]),
            ssp_range,
        })
    }
}

fn trim_nul(s: &[u8]) -> String {
    let len = s.iter().position(|b| *b == 0).unwrap_or(s.len());
    String::from_utf8_lossy(&s[..len]).into_owned()
}

impl core::fmt::Display for PreviousHop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.scheme, self.ssp)
    }
}
