use super::*;

/// The type of a security parameter or result item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SecurityItemType {
    InitializationVector,
    KeyInformation,
    FragmentRange,
    IntegritySignature,
    Salt,
    IntegrityCheckValue,
    Unrecognised(u64),
}

impl From<u64> for SecurityItemType {
    fn from(value: u64) -> Self {
        match value {
            1 => Self::InitializationVector,
            3 => Self::KeyInformation,
            4 => Self::FragmentRange,
            5 => Self::IntegritySignature,
            7 => Self::Salt,
            8 => Self::IntegrityCheckValue,
            v => Self::Unrecognised(v),
        }
    }
}

impl From<SecurityItemType> for u64 {
    fn from(value: SecurityItemType) -> Self {
        match value {
            SecurityItemType::InitializationVector => 1,
            SecurityItemType::KeyInformation => 3,
            SecurityItemType::FragmentRange => 4,
            SecurityItemType::IntegritySignature => 5,
            SecurityItemType::Salt => 7,
            SecurityItemType::IntegrityCheckValue => 8,
            SecurityItemType::Unrecognised(v) => v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SecurityValue {
    /// The range of the item's opaque bytes.
    Bytes(Range<usize>),
    FragmentRange { offset: u64, length: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SecurityItem {
    pub item_type: SecurityItemType,
    pub value: SecurityValue,
}

/// A Block Integrity or Block Confidentiality block.
///
/// Only the structure is decoded; nothing is verified or decrypted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SecurityBlock {
    pub target_block_type: u64,
    pub target_block_occurrence: u64,
    pub ciphersuite_type: u64,
    pub ciphersuite_flags: u64,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub parameters: Vec<SecurityItem>,
    pub results: Vec<SecurityItem>,
}

const HAS_PARAMETERS: u64 = 0x01;

impl SecurityBlock {
    pub(super) fn parse(reader: &mut Reader) -> Result<Self, Error> {
        let target_block_type = reader.parse().map_field_err("target block type")?;
        let target_block_occurrence = reader.parse().map_field_err("target block occurrence")?;
        let ciphersuite_type = reader.parse().map_field_err("ciphersuite type")?;
        let ciphersuite_flags = reader.parse().map_field_err("ciphersuite flags")?;

        let parameters = if ciphersuite_flags & HAS_PARAMETERS != 0 {
            parse_items(reader, "parameter")?
        } else {
            Vec::new()
        };
        let results = parse_items(reader, "result")?;

        Ok(Self {
            target_block_type,
            target_block_occurrence,
            ciphersuite_type,
            ciphersuite_flags,
            parameters,
            results,
        })
    }
}

fn parse_items(reader: &mut Reader, list: &'static str) -> Result<Vec<SecurityItem>, Error> {
    let len = reader.parse_length().map_field_err("security list length")?;
    let mut list_reader = reader.take(len).map_field_err("security list")?;

    let mut items = Vec::new();
    while !list_reader.is_empty() {
        let item_type = SecurityItemType::from(
            list_reader
                .parse::<u64>()
                .map_err(|_| Error::ListOverrun(list))?,
        );
        let item_len = list_reader
            .parse_length()
            .map_err(|_| Error::ListOverrun(list))?;
        let mut item = list_reader
            .take(item_len)
            .map_err(|_| Error::ListOverrun(list))?;

        let value = match item_type {
            SecurityItemType::FragmentRange => SecurityValue::FragmentRange {
                offset: item.parse().map_field_err("fragment range offset")?,
                length: item.parse().map_field_err("fragment range length")?,
            },
            _ => SecurityValue::Bytes(item.offset()..item.end()),
        };
        items.push(SecurityItem { item_type, value });
    }
    Ok(items)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn results_only() {
        // Targets the payload, ciphersuite 1, no parameters, one 4 byte signature
        let data = hex_literal::hex!("01 00 01 00 06 05 04 deadbeef");
        let mut reader = Reader::new(&data);
        let sb = SecurityBlock::parse(&mut reader).unwrap();
        assert_eq!(sb.target_block_type, 1);
        assert_eq!(sb.ciphersuite_type, 1);
        assert!(sb.parameters.is_empty());
        assert_eq!(
            sb.results,
            [SecurityItem {
                item_type: SecurityItemType::IntegritySignature,
                value: SecurityValue::Bytes(7..11)
            }]
        );
        assert!(reader.is_empty());
    }

    #[test]
    fn parameters_and_results() {
        // An IV, a fragment range, and an unrecognised item of zero length
        let data = hex_literal::hex!("01 00 02 01 0a 01 02 aabb 04 02 0a 14 09 00 03 08 01 ff");
        let sb = SecurityBlock::parse(&mut Reader::new(&data)).unwrap();
        assert_eq!(
            sb.parameters,
            [
                SecurityItem {
                    item_type: SecurityItemType::InitializationVector,
                    value: SecurityValue::Bytes(7..9)
                },
                SecurityItem {
                    item_type: SecurityItemType::FragmentRange,
                    value: SecurityValue::FragmentRange {
                        offset: 10,
                        length: 20
                    }
                },
                SecurityItem {
                    item_type: SecurityItemType::Unrecognised(9),
                    value: SecurityValue::Bytes(15..15)
                }
            ]
        );
        assert_eq!(
            sb.results,
            [SecurityItem {
                item_type: SecurityItemType::IntegrityCheckValue,
                value: SecurityValue::Bytes(18..19)
            }]
        );
    }

    #[test]
    fn item_overruns_list() {
        // The item claims 5 bytes of a 4 byte list
        let data = hex_literal::hex!("01 00 01 00 04 05 05 aabb");
        let e = SecurityBlock::parse(&mut Reader::new(&data)).unwrap_err();
        assert!(matches!(e, Error::ListOverrun("result")));
    }

    #[test]
    fn list_overruns_block() {
        let data = hex_literal::hex!("01 00 01 00 10 05 01 aa");
        let e = SecurityBlock::parse(&mut Reader::new(&data)).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Truncated);
    }
}
