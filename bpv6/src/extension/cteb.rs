use super::*;

/// The Custody Transfer Enhancement Block: a custody ID, and the custodian
/// that assigned it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CustodyTransfer {
    pub custody_id: u64,
    pub creator: String,
    pub creator_range: Range<usize>,
    /// Whether `creator` matches the custodian named by the primary block.
    pub valid: bool,
}

impl CustodyTransfer {
    pub(super) fn parse(
        header: &Header,
        reader: &mut Reader,
        ctx: &DecodeContext,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Self, Error> {
        let start = reader.offset();
        if header.flags.must_replicate || header.flags.has_eid_references {
            diagnostics.push(Diagnostic::advisory(
                ErrorKind::StructuralMismatch,
                data_range(reader, start),
                "Custody transfer enhancement block must not be replicated or carry EID references",
            ));
        }

        let custody_id = reader.parse().map_field_err("custody ID")?;
        let creator_range = reader
            .read_bytes(reader.remaining())
            .map_field_err("creator custodian")?;

        // Some agents NUL terminate the EID
        let mut creator = &reader.data()[creator_range.clone()];
        while let [rest @ .., 0] = creator {
            creator = rest;
        }

        let valid = !creator.is_empty() && creator == ctx.custodian.as_bytes();
        if !valid {
            diagnostics.push(Diagnostic::advisory(
                ErrorKind::CustodianMismatch,
                creator_range.clone(),
                format!(
                    "Custody transfer creator '{}' is not the bundle custodian '{}'",
                    String::from_utf8_lossy(creator),
                    ctx.custodian
                ),
            ));
        }

        Ok(Self {
            custody_id,
            creator: String::from_utf8_lossy(creator).into_owned(),
            creator_range,
            valid,
        })
    }
}
